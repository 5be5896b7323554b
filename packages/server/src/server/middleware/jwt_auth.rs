use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::domains::auth::actions::authenticate;
use crate::domains::users::models::User;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Authenticated user resolved from the `Authorization: Bearer` header.
///
/// Use as an extractor on protected routes; rejects with 401 when the header
/// is missing, the token is invalid or expired, or the user no longer exists.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A header that is not valid UTF-8 is treated as absent
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user = authenticate(header, &state.deps).await?;
        Ok(CurrentUser(user))
    }
}
