//! Production adapters and the dependency bundle handed to domain actions.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use twilio::{TwilioError, TwilioService};

use crate::domains::auth::JwtService;
use crate::domains::chats::models::{Chat, NewChat};
use crate::domains::users::models::{Preferences, User};
use crate::kernel::{BaseChatStore, BaseOtpVerifier, BaseUserStore, OtpError};

// =============================================================================
// TwilioService Adapter (implements BaseOtpVerifier trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseOtpVerifier trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseOtpVerifier for TwilioAdapter {
    async fn request_code(&self, phone: &str) -> Result<(), OtpError> {
        let response = self
            .0
            .send_otp(phone)
            .await
            .map_err(|e| OtpError::Provider(e.to_string()))?;
        tracing::info!(sid = %response.sid, status = %response.status, "Twilio verification created");
        Ok(())
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, OtpError> {
        match self.0.verify_otp(phone, code).await {
            Ok(check) => {
                tracing::info!(status = %check.status, "Twilio verification check");
                Ok(check.is_approved())
            }
            // Twilio drops the verification once it is approved or expired
            Err(TwilioError::VerificationNotFound) => Ok(false),
            Err(e) => Err(OtpError::Provider(e.to_string())),
        }
    }
}

// =============================================================================
// Postgres stores (delegate to the SQL in domain models)
// =============================================================================

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserStore for PostgresUserStore {
    async fn insert_if_absent(&self, id: &str) -> Result<User> {
        User::insert_if_absent(id, &self.pool).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        User::find_by_id(id, &self.pool).await
    }

    async fn find_by_ids(&self, ids: &[String], limit: usize) -> Result<Vec<User>> {
        User::find_by_ids(ids, limit as i64, &self.pool).await
    }

    async fn replace_preferences(&self, id: &str, preferences: &Preferences) -> Result<bool> {
        User::replace_preferences(id, preferences, &self.pool).await
    }
}

#[derive(Clone)]
pub struct PostgresChatStore {
    pool: PgPool,
}

impl PostgresChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseChatStore for PostgresChatStore {
    async fn recent_for_member(&self, member_id: &str, limit: usize) -> Result<Vec<Chat>> {
        Chat::find_recent_for_member(member_id, limit as i64, &self.pool).await
    }

    async fn insert(&self, chat: NewChat) -> Result<Chat> {
        Chat::insert(&chat, &self.pool).await
    }

    async fn insert_welcome(&self, member_id: &str) -> Result<bool> {
        Chat::insert_welcome(member_id, &self.pool).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Everything a domain action may touch. Built once at startup, shared
/// read-only behind `Arc`.
#[derive(Clone)]
pub struct ServerDeps {
    pub users: Arc<dyn BaseUserStore>,
    pub chats: Arc<dyn BaseChatStore>,
    pub otp: Arc<dyn BaseOtpVerifier>,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        users: Arc<dyn BaseUserStore>,
        chats: Arc<dyn BaseChatStore>,
        otp: Arc<dyn BaseOtpVerifier>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            chats,
            otp,
            jwt_service,
        }
    }

    /// Postgres-backed stores sharing one pool.
    pub fn with_postgres(
        pool: PgPool,
        otp: Arc<dyn BaseOtpVerifier>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self::new(
            Arc::new(PostgresUserStore::new(pool.clone())),
            Arc::new(PostgresChatStore::new(pool)),
            otp,
            jwt_service,
        )
    }
}
