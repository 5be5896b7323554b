// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "verify an OTP and open a session") lives in domain
// actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseOtpVerifier, BaseUserStore)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::domains::chats::models::{Chat, NewChat};
use crate::domains::users::models::{Preferences, User};

// =============================================================================
// OTP Verifier Trait (Infrastructure - SMS codes)
// =============================================================================

#[derive(Debug, Error)]
pub enum OtpError {
    /// The backing provider failed (network, credentials, bad recipient).
    /// The message is for logs only.
    #[error("{0}")]
    Provider(String),
}

#[async_trait]
pub trait BaseOtpVerifier: Send + Sync {
    /// Deliver a fresh code to `phone`. A later send supersedes earlier codes.
    async fn request_code(&self, phone: &str) -> Result<(), OtpError>;

    /// Check a code. `Ok(true)` consumes it; denied or unknown codes give `Ok(false)`.
    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, OtpError>;
}

// =============================================================================
// Credential Store Trait (Infrastructure - user documents)
// =============================================================================

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    /// Create the user with default preferences unless it already exists.
    /// Never modifies an existing record. Must be atomic per id.
    async fn insert_if_absent(&self, id: &str) -> Result<User>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Users whose id is in `ids`, at most `limit` of them.
    async fn find_by_ids(&self, ids: &[String], limit: usize) -> Result<Vec<User>>;

    /// Wholesale replacement of a user's preferences. Returns false if the
    /// user does not exist.
    async fn replace_preferences(&self, id: &str, preferences: &Preferences) -> Result<bool>;
}

// =============================================================================
// Chat Store Trait (Infrastructure - chat documents)
// =============================================================================

#[async_trait]
pub trait BaseChatStore: Send + Sync {
    /// Chats containing `member_id`, newest first.
    async fn recent_for_member(&self, member_id: &str, limit: usize) -> Result<Vec<Chat>>;

    async fn insert(&self, chat: NewChat) -> Result<Chat>;

    /// Store the welcome chat for `member_id` unless one was stored before.
    /// Must be atomic per member. Returns true if this call inserted it.
    async fn insert_welcome(&self, member_id: &str) -> Result<bool>;
}
