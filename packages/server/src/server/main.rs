// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use langbridge_core::domains::auth::JwtService;
use langbridge_core::kernel::ServerDeps;
use langbridge_core::server::{build_app, otp_verifier_from_config};
use langbridge_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,langbridge_core=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting LangBridge API");

    // Load configuration
    let config = Arc::new(Config::from_env().context("Failed to load configuration")?);
    tracing::info!(
        database_url = %config.database_url,
        jwt_expires_min = config.jwt_expires_min,
        jwt_secret = %config.masked_jwt_secret(),
        cors = ?config.allow_origins_list(),
        otp_provider = ?config.otp_provider,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let otp = otp_verifier_from_config(&config)?;
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expires_min));
    let deps = ServerDeps::with_postgres(pool.clone(), otp, jwt_service);

    // Build application
    let app = build_app(deps, &config.allow_origins_list());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
