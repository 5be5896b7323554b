use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only algorithm tokens are signed or accepted with.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // Subject (user id = phone number)
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,
}

/// JWT Service - creates and verifies JWT tokens
///
/// Tokens are stateless: validity depends only on the signature, the `exp`
/// claim and the current time. There is no revocation list.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl JwtService {
    /// Create new JWT service with secret and token lifetime in minutes
    ///
    /// Lifetimes too large for a `Duration` saturate, and issuing then fails.
    pub fn new(secret: &str, lifetime_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::try_minutes(lifetime_minutes).unwrap_or(Duration::MAX),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Create a new JWT token for a user
    pub fn create_token(&self, subject: &str) -> Result<String> {
        self.create_token_at(subject, Utc::now())
    }

    /// Create a token as if issued at `now`
    pub fn create_token_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| anyhow!("token lifetime {} overflows the clock", self.lifetime))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Verify a token against the clock reading `now`.
    ///
    /// A token is valid only while `now < exp`. No leeway is applied.
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        // exp is checked below against the supplied clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
