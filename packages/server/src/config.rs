use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Which backend issues and checks one-time codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpProvider {
    /// In-process verifier with a fixed code. Local development only.
    Dev,
    /// Twilio Verify.
    Twilio,
}

impl FromStr for OtpProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "twilio" => Ok(Self::Twilio),
            other => bail!("unknown OTP_PROVIDER '{}' (expected 'dev' or 'twilio')", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub verify_service_sid: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_min: i64,
    pub allow_origins: String,
    pub port: u16,
    pub otp_provider: OtpProvider,
    pub dev_otp_code: String,
    pub dev_otp_ttl_secs: i64,
    pub twilio: Option<TwilioConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let otp_provider: OtpProvider = env::var("OTP_PROVIDER")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()?;

        let twilio = match otp_provider {
            OtpProvider::Twilio => Some(TwilioConfig {
                account_sid: env::var("TWILIO_ACCOUNT_SID")
                    .context("TWILIO_ACCOUNT_SID must be set when OTP_PROVIDER=twilio")?,
                auth_token: env::var("TWILIO_AUTH_TOKEN")
                    .context("TWILIO_AUTH_TOKEN must be set when OTP_PROVIDER=twilio")?,
                verify_service_sid: env::var("TWILIO_VERIFY_SERVICE_SID")
                    .context("TWILIO_VERIFY_SERVICE_SID must be set when OTP_PROVIDER=twilio")?,
            }),
            OtpProvider::Dev => None,
        };

        let jwt_expires_min =
            parse_jwt_expires_min(&env::var("JWT_EXPIRES_MIN").unwrap_or_else(|_| "1440".to_string()))?;
        let dev_otp_ttl_secs =
            parse_dev_otp_ttl_secs(&env::var("DEV_OTP_TTL_SECS").unwrap_or_else(|_| "600".to_string()))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/langbridge".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string()),
            jwt_expires_min,
            allow_origins: env::var("ALLOW_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            otp_provider,
            dev_otp_code: env::var("DEV_OTP_CODE").unwrap_or_else(|_| "123456".to_string()),
            dev_otp_ttl_secs,
            twilio,
        })
    }

    /// Allowed CORS origins. `["*"]` means any origin.
    pub fn allow_origins_list(&self) -> Vec<String> {
        parse_origins(&self.allow_origins)
    }

    /// Signing secret safe to print: first two characters, then `****`.
    pub fn masked_jwt_secret(&self) -> String {
        let shown: String = self.jwt_secret.chars().take(2).collect();
        format!("{}****", shown)
    }
}

/// Longest accepted token lifetime: ten years.
pub const MAX_JWT_EXPIRES_MIN: i64 = 10 * 365 * 24 * 60;

/// Longest accepted dev code lifetime: one day.
pub const MAX_DEV_OTP_TTL_SECS: i64 = 24 * 60 * 60;

fn parse_jwt_expires_min(raw: &str) -> Result<i64> {
    let minutes: i64 = raw
        .trim()
        .parse()
        .context("JWT_EXPIRES_MIN must be a whole number of minutes")?;
    if !(1..=MAX_JWT_EXPIRES_MIN).contains(&minutes) {
        bail!(
            "JWT_EXPIRES_MIN must be between 1 and {} (got {})",
            MAX_JWT_EXPIRES_MIN,
            minutes
        );
    }
    Ok(minutes)
}

fn parse_dev_otp_ttl_secs(raw: &str) -> Result<i64> {
    let secs: i64 = raw
        .trim()
        .parse()
        .context("DEV_OTP_TTL_SECS must be a whole number of seconds")?;
    if !(1..=MAX_DEV_OTP_TTL_SECS).contains(&secs) {
        bail!(
            "DEV_OTP_TTL_SECS must be between 1 and {} (got {})",
            MAX_DEV_OTP_TTL_SECS,
            secs
        );
    }
    Ok(secs)
}

fn parse_origins(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return vec!["*".to_string()];
    }
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
