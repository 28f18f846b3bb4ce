//! # eventhubd — eventhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`eventhub.toml`, env vars)
//! - Initialize logging
//! - Open the `SQLite` connection pool and create the schema
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use eventhub_adapter_auth::{Argon2PasswordHasher, JwtTokenIssuer};
use eventhub_adapter_http_axum::state::AppState;
use eventhub_adapter_storage_sqlite_sqlx::{
    SqliteEventRepository, SqliteRegistrationRepository, SqliteUserRepository,
};
use eventhub_app::services::event_service::EventService;
use eventhub_app::services::registration_service::RegistrationService;
use eventhub_app::services::user_service::UserService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = config
        .storage()
        .build()
        .await
        .context("opening the database")?;
    let pool = db.pool().clone();

    // Repositories
    let user_repo = SqliteUserRepository::new(pool.clone());
    let event_repo = SqliteEventRepository::new(pool.clone())
        .with_delete_policy(config.database.delete_policy);
    let registration_repo = SqliteRegistrationRepository::new(pool);

    // Services
    let user_service = UserService::new(
        user_repo,
        Argon2PasswordHasher::new(),
        JwtTokenIssuer::new(&config.auth.jwt_secret, config.token_ttl()?),
    );
    let event_service = EventService::new(event_repo);
    let registration_service = RegistrationService::new(registration_repo);

    // HTTP
    let state = AppState::new(user_service, event_service, registration_service);
    let app = eventhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(
        address = %bind_addr,
        delete_policy = ?config.database.delete_policy,
        "eventhubd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.pool().close().await;
    tracing::info!("eventhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
