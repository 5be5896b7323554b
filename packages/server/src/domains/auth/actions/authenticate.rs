//! Bearer-token authentication

use tracing::debug;

use crate::common::AuthError;
use crate::domains::users::models::User;
use crate::kernel::ServerDeps;

const BEARER_PREFIX: &str = "bearer ";

/// Extract the token from an `Authorization` header value.
///
/// The `Bearer ` prefix is required and matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let prefix = header.get(..BEARER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = header[BEARER_PREFIX.len()..].trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the `Authorization` header to the stored user.
///
/// All failures are `Unauthenticated`; the precise reason is only logged.
pub async fn authenticate(
    authorization: Option<&str>,
    deps: &ServerDeps,
) -> Result<User, AuthError> {
    let Some(header) = authorization else {
        debug!("Missing Authorization header");
        return Err(AuthError::Unauthenticated);
    };

    let Some(token) = bearer_token(header) else {
        debug!("Authorization header is not a bearer token");
        return Err(AuthError::Unauthenticated);
    };

    let claims = deps.jwt_service.verify_token(token).map_err(|e| {
        debug!(reason = %e, "Rejected bearer token");
        AuthError::Unauthenticated
    })?;

    match deps.users.find_by_id(&claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            debug!(user_id = %claims.sub, "Token subject has no user record");
            Err(AuthError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;
    use chrono::{Duration, Utc};

    const PHONE: &str = "+19995550123";

    #[test]
    fn test_bearer_prefix_variants() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearerabc"), None);
    }

    #[test]
    fn test_non_ascii_header_does_not_panic() {
        assert_eq!(bearer_token("Bé"), None);
        assert_eq!(bearer_token("Beareré abc"), None);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();
        test_deps.users.insert(User::new(PHONE));

        let token = deps.jwt_service.create_token(PHONE).unwrap();
        let header = format!("Bearer {}", token);

        let user = authenticate(Some(&header), &deps).await.unwrap();
        assert_eq!(user.id, PHONE);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let deps = TestDependencies::new().server_deps();
        let err = authenticate(None, &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_raw_token_without_prefix() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();
        test_deps.users.insert(User::new(PHONE));

        let token = deps.jwt_service.create_token(PHONE).unwrap();
        let err = authenticate(Some(&token), &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();
        test_deps.users.insert(User::new(PHONE));

        let issued = Utc::now() - deps.jwt_service.lifetime() - Duration::seconds(1);
        let token = deps.jwt_service.create_token_at(PHONE, issued).unwrap();
        let header = format!("Bearer {}", token);

        let err = authenticate(Some(&header), &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let deps = TestDependencies::new().server_deps();

        let token = deps.jwt_service.create_token(PHONE).unwrap();
        let header = format!("Bearer {}", token);

        let err = authenticate(Some(&header), &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }
}
