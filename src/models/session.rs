//! Mocked login request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body of `POST /api/auth/login`.
///
/// ```json
/// { "email": "admin@example.com", "password": "admin" }
/// ```
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Signed-in staff member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Response of a successful login.
///
/// ```json
/// {
///   "accessToken": "61646d696e406578616d706c652e636f6d.1735718400.9f2c...",
///   "expiresAt": "2025-01-01T08:00:00Z",
///   "user": { "id": "…", "email": "admin@example.com", "name": "admin" }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}
