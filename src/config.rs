//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Where call data is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Postgres (Supabase) database reached through `DATABASE_URL`
    Postgres,

    /// In-process demo dataset, no database required
    Memory,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Postgres => "postgres",
            DataSource::Memory => "memory",
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATA_SOURCE` (optional): `postgres` or `memory`, defaults to `postgres`
/// - `DATABASE_URL` (required for `postgres`): PostgreSQL connection string
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `RUN_MIGRATIONS` (optional): apply `migrations/` on startup, defaults to true
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `STORAGE_PUBLIC_URL` (optional): base URL of the storage service serving recordings
/// - `RECORDINGS_BUCKET` (optional): storage bucket holding recordings, defaults to `recordings`
/// - `MOCK_LOGIN_EMAIL` / `MOCK_LOGIN_PASSWORD` (optional): demo credentials for the mocked login
/// - `SESSION_SECRET` (optional): HMAC key for session tokens, random per process when unset
/// - `SESSION_TTL_SECONDS` (optional): session lifetime, defaults to 8 hours
/// - `CORS_ALLOWED_ORIGIN` (optional): single origin allowed by CORS
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_source")]
    pub data_source: DataSource,

    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_true")]
    pub run_migrations: bool,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub storage_public_url: Option<String>,

    #[serde(default = "default_bucket")]
    pub recordings_bucket: String,

    #[serde(default = "default_login_email")]
    pub mock_login_email: String,

    #[serde(default = "default_login_password")]
    pub mock_login_password: String,

    pub session_secret: Option<String>,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: i64,

    pub cors_allowed_origin: Option<String>,
}

fn default_data_source() -> DataSource {
    DataSource::Postgres
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_bucket() -> String {
    "recordings".to_string()
}

fn default_login_email() -> String {
    "admin@example.com".to_string()
}

fn default_login_password() -> String {
    "admin".to_string()
}

/// Eight hours.
fn default_session_ttl() -> i64 {
    8 * 60 * 60
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types. A missing `DATABASE_URL` is reported later, when the
    /// Postgres store is opened.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Parse configuration from an explicit list of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }
}
