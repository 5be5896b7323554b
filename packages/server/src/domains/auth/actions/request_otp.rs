//! Request OTP action

use tracing::{error, info};

use crate::common::AuthError;
use crate::kernel::ServerDeps;

/// Ask the verifier to deliver a code to `phone`.
///
/// Touches no user record. Safe to call repeatedly; each call supersedes the
/// previous code.
pub async fn request_otp(phone: &str, deps: &ServerDeps) -> Result<(), AuthError> {
    info!(phone = %phone, "Sending OTP");

    deps.otp.request_code(phone).await.map_err(|e| {
        error!(phone = %phone, error = %e, "Failed to send OTP");
        AuthError::DeliveryFailed(e.to_string())
    })?;

    info!(phone = %phone, "OTP sent");
    Ok(())
}
