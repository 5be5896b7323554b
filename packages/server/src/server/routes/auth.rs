//! OTP routes.
//!
//! Two route families share one verifier and one core: the `/auth/otp/*`
//! pair kept for older clients and the `/otp/*` pair used by the mobile
//! app. Either field spelling (`phone` / `phoneNumber`) is accepted on both.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::AuthError;
use crate::domains::auth::actions::{request_otp, verify_otp};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    #[serde(alias = "phoneNumber")]
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(alias = "phoneNumber")]
    pub phone: String,
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct SentResponse {
    pub sent: bool,
}

#[derive(Debug, Serialize)]
pub struct SendStatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn phone_from(raw: &str) -> Result<&str, ApiError> {
    let phone = raw.trim();
    if phone.is_empty() {
        return Err(ApiError::Validation("phone must not be empty".to_string()));
    }
    Ok(phone)
}

/// POST /auth/otp/request
pub async fn otp_request_handler(
    State(state): State<AppState>,
    Json(body): Json<PhoneRequest>,
) -> Result<Json<SentResponse>, ApiError> {
    request_otp(phone_from(&body.phone)?, &state.deps).await?;
    Ok(Json(SentResponse { sent: true }))
}

/// POST /auth/otp/verify - an invalid code is 400
pub async fn otp_verify_handler(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = verify_otp(phone_from(&body.phone)?, body.otp.trim(), &state.deps).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /otp/send
pub async fn otp_send_handler(
    State(state): State<AppState>,
    Json(body): Json<PhoneRequest>,
) -> Result<Json<SendStatusResponse>, ApiError> {
    request_otp(phone_from(&body.phone)?, &state.deps).await?;
    Ok(Json(SendStatusResponse { status: "sent" }))
}

/// POST /otp/verify - an invalid code is 401
pub async fn otp_check_handler(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = verify_otp(phone_from(&body.phone)?, body.otp.trim(), &state.deps)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCode => ApiError::Unauthorized("Invalid OTP".to_string()),
            other => other.into(),
        })?;
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_field_spellings() {
        let legacy: PhoneRequest = serde_json::from_str(r#"{"phone":"+19995550123"}"#).unwrap();
        let app: PhoneRequest =
            serde_json::from_str(r#"{"phoneNumber":"+19995550123"}"#).unwrap();
        assert_eq!(legacy.phone, app.phone);

        let verify: VerifyRequest =
            serde_json::from_str(r#"{"phoneNumber":"+19995550123","otp":"123456"}"#).unwrap();
        assert_eq!(verify.otp, "123456");
    }

    #[test]
    fn test_blank_phone_rejected() {
        assert!(matches!(phone_from("   "), Err(ApiError::Validation(_))));
        assert_eq!(phone_from(" +1555 ").unwrap(), "+1555");
    }
}
