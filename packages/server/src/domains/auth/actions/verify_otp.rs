//! Verify OTP action

use tracing::{error, info, warn};

use crate::common::AuthError;
use crate::kernel::ServerDeps;

/// Verify a code and open a session for `phone`.
///
/// On approval the user is created with default preferences if this is the
/// first verification for the phone; an existing user is left untouched.
/// Returns a signed session token whose subject is `phone`.
pub async fn verify_otp(phone: &str, code: &str, deps: &ServerDeps) -> Result<String, AuthError> {
    let approved = deps.otp.check_code(phone, code).await.map_err(|e| {
        error!(phone = %phone, error = %e, "OTP verification failed");
        AuthError::ProviderError(e.to_string())
    })?;

    if !approved {
        warn!(phone = %phone, "Invalid OTP");
        return Err(AuthError::InvalidCode);
    }

    let user = deps.users.insert_if_absent(phone).await?;

    let token = deps.jwt_service.create_token(&user.id)?;

    info!(user_id = %user.id, "OTP verified, token issued");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::actions::request_otp;
    use crate::domains::users::models::{Preferences, User};
    use crate::kernel::test_dependencies::TEST_OTP_CODE;
    use crate::kernel::{BaseUserStore, MockOtpVerifier, TestDependencies};

    const PHONE: &str = "+19995550123";

    #[tokio::test]
    async fn test_first_verification_creates_user() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        request_otp(PHONE, &deps).await.unwrap();
        let token = verify_otp(PHONE, TEST_OTP_CODE, &deps).await.unwrap();

        let claims = deps.jwt_service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, PHONE);

        let user = test_deps.users.find_by_id(PHONE).await.unwrap().unwrap();
        assert_eq!(user.preferences, Preferences::default());
        assert!(user.display_name.is_none());
        assert_eq!(test_deps.users.len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_code_changes_nothing() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        request_otp(PHONE, &deps).await.unwrap();
        let err = verify_otp(PHONE, "000000", &deps).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCode));
        assert!(test_deps.users.is_empty());
    }

    #[tokio::test]
    async fn test_code_cannot_be_replayed() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        request_otp(PHONE, &deps).await.unwrap();
        verify_otp(PHONE, TEST_OTP_CODE, &deps).await.unwrap();

        let err = verify_otp(PHONE, TEST_OTP_CODE, &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCode));
        assert_eq!(test_deps.users.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_preferences_survive_verification() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        let mut existing = User::new(PHONE);
        existing.preferences = Preferences {
            languages: vec!["fr".to_string(), "en".to_string()],
            show_original: false,
        };
        test_deps.users.insert(existing.clone());

        request_otp(PHONE, &deps).await.unwrap();
        verify_otp(PHONE, TEST_OTP_CODE, &deps).await.unwrap();

        let user = test_deps.users.find_by_id(PHONE).await.unwrap().unwrap();
        assert_eq!(user.preferences, existing.preferences);
    }

    #[tokio::test]
    async fn test_provider_failure_on_check() {
        let test_deps = TestDependencies::with_verifier(MockOtpVerifier::failing("timeout"));
        let deps = test_deps.server_deps();

        let err = verify_otp(PHONE, TEST_OTP_CODE, &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::ProviderError(_)));
        assert!(test_deps.users.is_empty());
    }
}
