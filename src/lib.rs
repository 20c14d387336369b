//! Call-center analytics API.
//!
//! A REST API over call records: lists and searches phone calls, exposes
//! AI-generated transcripts and sentiment analysis, aggregates per-manager
//! statistics, and lets staff annotate calls.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, or an in-memory demo dataset
//! - **Authentication**: mocked login issuing HMAC-signed session tokens
//! - **Format**: JSON requests/responses with camelCase keys

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use anyhow::Context;

use crate::config::{Config, DataSource};
use crate::services::session_service::SessionService;
use crate::services::storage::RecordingLinks;
use crate::state::AppState;
use crate::store::{CallStore, memory::MemoryStore, postgres::PgStore};

/// Open the configured data source and assemble the shared state.
///
/// # Postgres
///
/// Creates the connection pool and, unless `RUN_MIGRATIONS=false`, applies
/// pending migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing for the Postgres source, the
/// database is unreachable, a migration fails, `SESSION_TTL_SECONDS` is not
/// between 1 second and one year, or `STORAGE_PUBLIC_URL` is not a valid URL.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store: Arc<dyn CallStore> = match config.data_source {
        DataSource::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when DATA_SOURCE=postgres")?;

            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            if config.run_migrations {
                db::run_migrations(&pool).await?;
                tracing::info!("Database migrations complete");
            }

            Arc::new(PgStore::new(pool))
        }
        DataSource::Memory => {
            tracing::warn!("Serving mocked demo data from memory");
            Arc::new(MemoryStore::new(store::demo::dataset()))
        }
    };

    let sessions = SessionService::new(
        config.session_secret.as_deref(),
        config.session_ttl_seconds,
        config.mock_login_email.clone(),
        config.mock_login_password.clone(),
    )
    .context("SESSION_TTL_SECONDS is out of range")?;
    if config.session_secret.is_none() {
        tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
    }

    let recordings = RecordingLinks::new(
        config.storage_public_url.as_deref(),
        config.recordings_bucket.clone(),
    )
    .context("STORAGE_PUBLIC_URL is not a valid URL")?;

    Ok(AppState::new(store, sessions, recordings, config.data_source))
}
