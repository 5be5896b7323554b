//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use chrono::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use twilio::{TwilioOptions, TwilioService};

use crate::config::{Config, OtpProvider};
use crate::kernel::{BaseOtpVerifier, DevOtpVerifier, ServerDeps, TwilioAdapter};
use crate::server::routes::{
    contacts_sync_handler, health_handler, me_handler, otp_check_handler, otp_request_handler,
    otp_send_handler, otp_verify_handler, recent_chats_handler, settings_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

impl AppState {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps: Arc::new(deps),
        }
    }
}

/// Pick the OTP backend named by the configuration.
pub fn otp_verifier_from_config(config: &Config) -> Result<Arc<dyn BaseOtpVerifier>> {
    match config.otp_provider {
        OtpProvider::Twilio => {
            let twilio = config
                .twilio
                .clone()
                .context("Twilio settings missing for OTP_PROVIDER=twilio")?;
            let service = TwilioService::new(TwilioOptions {
                account_sid: twilio.account_sid,
                auth_token: twilio.auth_token,
                service_id: twilio.verify_service_sid,
            });
            tracing::info!("OTP provider: Twilio Verify");
            Ok(Arc::new(TwilioAdapter::new(Arc::new(service))))
        }
        OtpProvider::Dev => {
            tracing::warn!(
                "OTP provider: in-memory dev verifier (fixed code, local development only)"
            );
            let ttl = Duration::try_seconds(config.dev_otp_ttl_secs)
                .context("DEV_OTP_TTL_SECS is out of range")?;
            Ok(Arc::new(DevOtpVerifier::new(config.dev_otp_code.clone(), ttl)))
        }
    }
}

/// CORS for `["*"]` allows any origin without credentials; an explicit list
/// allows credentials and mirrors the requested methods and headers.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let state = AppState::new(deps);

    Router::new()
        // Health check
        .route("/", get(health_handler))
        // OTP (legacy field names)
        .route("/auth/otp/request", post(otp_request_handler))
        .route("/auth/otp/verify", post(otp_verify_handler))
        // OTP (app)
        .route("/otp/send", post(otp_send_handler))
        .route("/otp/verify", post(otp_check_handler))
        // Bearer-protected
        .route("/users/me", get(me_handler))
        .route("/settings", post(settings_handler))
        .route("/chats/recent", get(recent_chats_handler))
        // Public
        .route("/contacts/sync", post(contacts_sync_handler))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
