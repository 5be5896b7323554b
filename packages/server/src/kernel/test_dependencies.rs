// TestDependencies - in-memory implementations for testing
//
// Provides stores and verifiers that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{BaseChatStore, BaseOtpVerifier, BaseUserStore, OtpError, ServerDeps};
use crate::domains::auth::JwtService;
use crate::domains::chats::models::{Chat, NewChat};
use crate::domains::users::models::{Preferences, User};

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_OTP_CODE: &str = "123456";

// =============================================================================
// In-memory user store
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seed a user directly, bypassing the OTP flow
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }
}

#[async_trait]
impl BaseUserStore for InMemoryUserStore {
    async fn insert_if_absent(&self, id: &str) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .entry(id.to_string())
            .or_insert_with(|| User::new(id));
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String], limit: usize) -> Result<Vec<User>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let users = self.users.lock().unwrap();
        let mut found: Vec<User> = users
            .values()
            .filter(|u| wanted.contains(u.id.as_str()))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found.truncate(limit);
        Ok(found)
    }

    async fn replace_preferences(&self, id: &str, preferences: &Preferences) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(id) {
            Some(user) => {
                user.preferences = preferences.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// In-memory chat store
// =============================================================================

#[derive(Default)]
pub struct InMemoryChatStore {
    chats: Mutex<Vec<Chat>>,
    welcomed: Mutex<HashSet<String>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chats.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseChatStore for InMemoryChatStore {
    async fn recent_for_member(&self, member_id: &str, limit: usize) -> Result<Vec<Chat>> {
        let chats = self.chats.lock().unwrap();
        Ok(chats
            .iter()
            .rev()
            .filter(|c| c.members.iter().any(|m| m == member_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(&self, chat: NewChat) -> Result<Chat> {
        let mut chats = self.chats.lock().unwrap();
        Ok(push_chat(&mut chats, chat))
    }

    async fn insert_welcome(&self, member_id: &str) -> Result<bool> {
        let mut welcomed = self.welcomed.lock().unwrap();
        if !welcomed.insert(member_id.to_string()) {
            return Ok(false);
        }
        let mut chats = self.chats.lock().unwrap();
        push_chat(&mut chats, NewChat::welcome(member_id));
        Ok(true)
    }
}

fn push_chat(chats: &mut Vec<Chat>, chat: NewChat) -> Chat {
    let stored = Chat {
        id: chats.len() as i64 + 1,
        room: chat.room,
        members: chat.members,
        last_message: chat.last_message,
        created_at: Utc::now(),
    };
    chats.push(stored.clone());
    stored
}

// =============================================================================
// Mock OTP verifier
// =============================================================================

/// Verifier that behaves like a production provider: every send issues
/// `code`, and an approved code cannot be used again.
pub struct MockOtpVerifier {
    code: String,
    pending: Mutex<HashMap<String, String>>,
    sent: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl MockOtpVerifier {
    pub fn new() -> Self {
        Self {
            code: TEST_OTP_CODE.to_string(),
            pending: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Every call fails as if the provider were down
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Phones a code was sent to, in order
    pub fn sent_to(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockOtpVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOtpVerifier for MockOtpVerifier {
    async fn request_code(&self, phone: &str) -> Result<(), OtpError> {
        if let Some(message) = &self.failure {
            return Err(OtpError::Provider(message.clone()));
        }
        self.sent.lock().unwrap().push(phone.to_string());
        self.pending
            .lock()
            .unwrap()
            .insert(phone.to_string(), self.code.clone());
        Ok(())
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, OtpError> {
        if let Some(message) = &self.failure {
            return Err(OtpError::Provider(message.clone()));
        }
        let mut pending = self.pending.lock().unwrap();
        if pending.get(phone).is_some_and(|expected| expected == code) {
            pending.remove(phone);
            return Ok(true);
        }
        Ok(false)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// In-memory ServerDeps with handles kept for assertions.
pub struct TestDependencies {
    pub users: Arc<InMemoryUserStore>,
    pub chats: Arc<InMemoryChatStore>,
    pub otp: Arc<MockOtpVerifier>,
    pub jwt_service: Arc<JwtService>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_verifier(MockOtpVerifier::new())
    }

    pub fn with_verifier(otp: MockOtpVerifier) -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            chats: Arc::new(InMemoryChatStore::new()),
            otp: Arc::new(otp),
            jwt_service: Arc::new(JwtService::new(TEST_JWT_SECRET, 60)),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.users.clone(),
            self.chats.clone(),
            self.otp.clone(),
            self.jwt_service.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
