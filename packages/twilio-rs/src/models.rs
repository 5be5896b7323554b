use serde::Deserialize;

/// Response from `POST /v2/Services/{sid}/Verifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct OTPResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub channel: String,
    #[serde(default)]
    pub valid: bool,
}

/// Response from `POST /v2/Services/{sid}/VerificationCheck`.
#[derive(Debug, Clone, Deserialize)]
pub struct OTPVerifyResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    #[serde(default)]
    pub valid: bool,
}

impl OTPVerifyResponse {
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }
}

/// Error body Twilio returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioApiError {
    #[serde(default)]
    pub code: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub more_info: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}
