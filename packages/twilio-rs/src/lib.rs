//! Minimal client for the Twilio Verify v2 API.
//!
//! Only the two calls needed for phone verification are covered: starting a
//! verification (Twilio delivers the code) and checking a submitted code.

use std::collections::HashMap;

pub mod models;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use crate::models::{OTPResponse, OTPVerifyResponse, TwilioApiError};

const DEFAULT_BASE_URL: &str = "https://verify.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    pub service_id: String,
}

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Twilio answered with a non-success status.
    #[error("Twilio returned {status}: {message}")]
    Api { status: u16, message: String },

    /// No pending verification for the recipient (expired, approved
    /// already, or never started).
    #[error("no pending verification for recipient")]
    VerificationNotFound,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    base_url: String,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Point the client at another host (local mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxy settings).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn service_url(&self, resource: &str) -> String {
        format!(
            "{base}/v2/Services/{serv_id}/{resource}",
            base = self.base_url,
            serv_id = self.options.service_id,
        )
    }

    async fn post_form(
        &self,
        url: String,
        form_body: &HashMap<&str, &str>,
    ) -> Result<reqwest::Response, TwilioError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(form_body)
            .send()
            .await?;
        Ok(response)
    }

    /// Start a verification; Twilio delivers the code to `recipient`.
    pub async fn send_otp(&self, recipient: &str) -> Result<OTPResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Channel", channel_for(recipient));

        let response = self
            .post_form(self.service_url("Verifications"), &form_body)
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        let data = response.json::<OTPResponse>().await?;
        tracing::debug!(sid = %data.sid, status = %data.status, "Twilio verification started");
        Ok(data)
    }

    /// Check a code. A non-`approved` status comes back as `Ok`; callers
    /// decide with [`OTPVerifyResponse::is_approved`].
    pub async fn verify_otp(
        &self,
        recipient: &str,
        code: &str,
    ) -> Result<OTPVerifyResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Code", code);

        let response = self
            .post_form(self.service_url("VerificationCheck"), &form_body)
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TwilioError::VerificationNotFound);
        }
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        let data = response.json::<OTPVerifyResponse>().await?;
        tracing::debug!(sid = %data.sid, status = %data.status, "Twilio verification checked");
        Ok(data)
    }
}

/// Determine channel based on recipient format (email vs phone)
fn channel_for(recipient: &str) -> &'static str {
    if recipient.contains('@') {
        "email"
    } else {
        "sms"
    }
}

async fn api_error(status: StatusCode, response: reqwest::Response) -> TwilioError {
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<TwilioApiError>(&body) {
        Ok(err) => err.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };
    TwilioError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TwilioService {
        TwilioService::new(TwilioOptions {
            account_sid: "AC_test".to_string(),
            auth_token: "token".to_string(),
            service_id: "VA_test".to_string(),
        })
    }

    #[test]
    fn test_channel_detection() {
        assert_eq!(channel_for("+19995550123"), "sms");
        assert_eq!(channel_for("someone@example.com"), "email");
    }

    #[test]
    fn test_service_urls() {
        let twilio = service();
        assert_eq!(
            twilio.service_url("Verifications"),
            "https://verify.twilio.com/v2/Services/VA_test/Verifications"
        );

        let local = service().with_base_url("http://127.0.0.1:9999/");
        assert_eq!(
            local.service_url("VerificationCheck"),
            "http://127.0.0.1:9999/v2/Services/VA_test/VerificationCheck"
        );
    }

    #[test]
    fn test_verify_response_approval() {
        let approved: OTPVerifyResponse = serde_json::from_str(
            r#"{"sid":"VE1","status":"approved","to":"+19995550123","valid":true}"#,
        )
        .unwrap();
        assert!(approved.is_approved());

        let pending: OTPVerifyResponse =
            serde_json::from_str(r#"{"sid":"VE2","status":"pending","to":"+19995550123"}"#)
                .unwrap();
        assert!(!pending.is_approved());
        assert!(!pending.valid);
    }

    #[test]
    fn test_api_error_body() {
        let err: TwilioApiError = serde_json::from_str(
            r#"{"code":60200,"message":"Invalid parameter `To`","more_info":"https://www.twilio.com/docs/errors/60200","status":400}"#,
        )
        .unwrap();
        assert_eq!(err.code, Some(60200));
        assert_eq!(err.message, "Invalid parameter `To`");
    }
}
