//! In-process OTP verifier for local development.
//!
//! Not for production: codes are fixed and live only in this process. The
//! map is owned by the verifier and guarded by a mutex, codes expire after a
//! TTL, are single use, and are dropped after too many wrong guesses.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::kernel::{BaseOtpVerifier, OtpError};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
struct PendingCode {
    code: String,
    issued_at: DateTime<Utc>,
    failed_attempts: u32,
}

pub struct DevOtpVerifier {
    code: String,
    ttl: Duration,
    max_attempts: u32,
    pending: Mutex<HashMap<String, PendingCode>>,
}

impl DevOtpVerifier {
    pub fn new(code: impl Into<String>, ttl: Duration) -> Self {
        Self {
            code: code.into(),
            ttl,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    fn issue_at(&self, phone: &str, now: DateTime<Utc>) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.insert(
            phone.to_string(),
            PendingCode {
                code: self.code.clone(),
                issued_at: now,
                failed_attempts: 0,
            },
        );
    }

    fn check_at(&self, phone: &str, code: &str, now: DateTime<Utc>) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(entry) = pending.get_mut(phone) else {
            return false;
        };

        let expired = entry
            .issued_at
            .checked_add_signed(self.ttl)
            .map_or(true, |expires_at| now >= expires_at);
        if expired {
            pending.remove(phone);
            return false;
        }

        if entry.code == code {
            pending.remove(phone);
            return true;
        }

        entry.failed_attempts += 1;
        if entry.failed_attempts >= self.max_attempts {
            pending.remove(phone);
        }
        false
    }
}

#[async_trait]
impl BaseOtpVerifier for DevOtpVerifier {
    async fn request_code(&self, phone: &str) -> Result<(), OtpError> {
        self.issue_at(phone, Utc::now());
        tracing::info!(phone = %phone, code = %self.code, "Dev OTP issued");
        Ok(())
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, OtpError> {
        Ok(self.check_at(phone, code, Utc::now()))
    }
}
