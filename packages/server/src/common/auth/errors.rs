use thiserror::Error;

/// Failures of the authentication core.
///
/// Token failure reasons (malformed, expired, bad signature) collapse into
/// `Unauthenticated` here; they are logged where they happen.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Failed to send verification code: {0}")]
    DeliveryFailed(String),

    #[error("Failed to verify code: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
