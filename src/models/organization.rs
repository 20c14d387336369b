//! Organization (tenant) and Binotel account models.
//!
//! Every call belongs to an organization and, usually, to one of the
//! organization's Binotel telephony accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an organization record from the database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,

    /// URL-safe unique identifier
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Represents a Binotel account record from the database.
///
/// # Secret Storage
///
/// `api_key` is the provider credential used by the ingestion pipeline. It is
/// never serialized; clients only see `BinotelAccountResponse::api_key_hint`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BinotelAccount {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub api_key: String,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Query string of `GET /api/binotel-accounts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinotelAccountListParams {
    pub organization_id: Option<Uuid>,
}

/// Binotel account as returned to clients.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "9b1c...",
///   "organizationId": "3f0e...",
///   "name": "Main line",
///   "apiKeyHint": "••••a1f9",
///   "phoneNumber": "+380443334455",
///   "isActive": true,
///   "createdAt": "2025-01-10T08:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinotelAccountResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub api_key_hint: String,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BinotelAccount> for BinotelAccountResponse {
    fn from(account: BinotelAccount) -> Self {
        Self {
            id: account.id,
            organization_id: account.organization_id,
            name: account.name,
            api_key_hint: mask_secret(&account.api_key),
            phone_number: account.phone_number,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

/// Keep only the last four characters of a secret.
///
/// Secrets of four characters or fewer are masked entirely.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "••••".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("••••{}", tail)
}
