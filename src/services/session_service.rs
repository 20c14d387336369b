//! Session service for the mocked login.
//!
//! Real authentication is handled by Supabase Auth in production. This
//! service stands in for it: it checks a single configured demo account and
//! issues HMAC-SHA256 signed session tokens that the auth middleware verifies.
//!
//! # Token Format
//!
//! ```text
//! <hex(email)>.<expires_unix>.<hex(hmac_sha256(secret, "<hex(email)>.<expires_unix>"))>
//! ```

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session::{LoginRequest, LoginResponse, SessionUser};

type HmacSha256 = Hmac<Sha256>;

/// Longest accepted session lifetime: one year.
pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// The configured session lifetime is outside `1..=MAX_TTL_SECONDS`.
#[derive(Debug, thiserror::Error)]
#[error("session TTL must be between 1 and {max} seconds, got {0}", max = MAX_TTL_SECONDS)]
pub struct InvalidSessionTtl(pub i64);

/// Issues and verifies session tokens for the configured demo account.
#[derive(Clone)]
pub struct SessionService {
    secret: Vec<u8>,
    ttl: Duration,
    login_email: String,
    login_password: String,
}

impl SessionService {
    /// Create a service.
    ///
    /// When `secret` is `None` a random 32-byte key is generated, so tokens
    /// do not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSessionTtl` unless `ttl_seconds` is in
    /// `1..=MAX_TTL_SECONDS`.
    pub fn new(
        secret: Option<&str>,
        ttl_seconds: i64,
        login_email: impl Into<String>,
        login_password: impl Into<String>,
    ) -> Result<Self, InvalidSessionTtl> {
        if !(1..=MAX_TTL_SECONDS).contains(&ttl_seconds) {
            return Err(InvalidSessionTtl(ttl_seconds));
        }

        let secret = match secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                let bytes: [u8; 32] = rand::random();
                bytes.to_vec()
            }
        };

        Ok(Self {
            secret,
            ttl: Duration::seconds(ttl_seconds),
            login_email: login_email.into(),
            login_password: login_password.into(),
        })
    }

    /// Check credentials against the demo account and issue a token.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: email or password is blank
    /// - `Unauthorized`: credentials do not match
    pub fn login(&self, request: LoginRequest, now: DateTime<Utc>) -> Result<LoginResponse, AppError> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::InvalidRequest(
                "email and password are required".to_string(),
            ));
        }

        if !email.eq_ignore_ascii_case(&self.login_email) || request.password != self.login_password
        {
            tracing::warn!(email = %email, "rejected login attempt");
            return Err(AppError::Unauthorized);
        }

        let email = email.to_ascii_lowercase();
        let (access_token, expires_at) = self.issue(&email, now)?;
        tracing::info!(email = %email, "session issued");

        Ok(LoginResponse {
            access_token,
            expires_at,
            user: session_user(&email),
        })
    }

    /// Sign a token for `email` valid until `now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns `Internal` when the expiry falls outside the representable
    /// date range.
    pub fn issue(&self, email: &str, now: DateTime<Utc>) -> Result<(String, DateTime<Utc>), AppError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("session expiry is out of range".to_string()))?;
        let payload = format!("{}.{}", hex::encode(email), expires_at.timestamp());
        let signature = hex::encode(self.mac(&payload).finalize().into_bytes());

        // Round to whole seconds so the reported expiry matches the token.
        let expires_at = DateTime::from_timestamp(expires_at.timestamp(), 0).unwrap_or(expires_at);

        Ok((format!("{}.{}", payload, signature), expires_at))
    }

    /// Verify a token and return the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the token is malformed, its signature does
    /// not match, or it expired at or before `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionUser, AppError> {
        let mut parts = token.split('.');
        let (Some(email_hex), Some(expires), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::Unauthorized);
        };

        let signature = hex::decode(signature).map_err(|_| AppError::Unauthorized)?;
        self.mac(&format!("{}.{}", email_hex, expires))
            .verify_slice(&signature)
            .map_err(|_| AppError::Unauthorized)?;

        let expires: i64 = expires.parse().map_err(|_| AppError::Unauthorized)?;
        if expires <= now.timestamp() {
            return Err(AppError::Unauthorized);
        }

        let email = hex::decode(email_hex)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(AppError::Unauthorized)?;

        Ok(session_user(&email))
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC key length is valid");
        mac.update(payload.as_bytes());
        mac
    }
}

/// Build the user record for an email.
///
/// The id is the first 16 bytes of SHA-256(email), so it is stable across
/// logins and restarts.
fn session_user(email: &str) -> SessionUser {
    let digest = Sha256::digest(email.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);

    let name = email.split('@').next().unwrap_or(email).to_string();

    SessionUser {
        id: Uuid::from_bytes(bytes),
        email: email.to_string(),
        name,
    }
}
