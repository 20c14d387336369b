//! Call data models and API request/response types.
//!
//! This module defines:
//! - `Call`: Database entity representing a phone call
//! - `CallFilter` / `Page`: validated list criteria shared by every store
//! - `CallListParams`: raw query string of the list, search and stats endpoints
//! - `AnnotateCallRequest` / `CallAnnotation`: staff annotations
//! - `CallResponse` / `CallDetailResponse`: Response bodies returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::analysis::{AiAnalysisResponse, Sentiment};
use crate::models::transcript::TranscriptResponse;
use crate::services::storage::RecordingLinks;

/// Default page size of call listings.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 200;

/// Longest accepted annotation note, in characters.
pub const MAX_NOTES_CHARS: usize = 5000;

/// Most tags a call may carry.
pub const MAX_TAGS: usize = 20;

/// Who initiated the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Incoming => "incoming",
            CallDirection::Outgoing => "outgoing",
        }
    }
}

/// How the call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Answered,
    Missed,
    Busy,
    Failed,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Answered => "answered",
            CallStatus::Missed => "missed",
            CallStatus::Busy => "busy",
            CallStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "answered" => Some(CallStatus::Answered),
            "missed" => Some(CallStatus::Missed),
            "busy" => Some(CallStatus::Busy),
            "failed" => Some(CallStatus::Failed),
            _ => None,
        }
    }
}

/// Represents a call record from the database.
///
/// # Database Table
///
/// Maps to the `calls` table. Rows are written by the upstream ingestion
/// pipeline; this service only reads them and updates the annotation columns
/// (`notes`, `tags`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Call {
    pub id: Uuid,

    /// Tenant owning the call
    pub organization_id: Uuid,

    /// Telephony account the call came through
    pub binotel_account_id: Option<Uuid>,

    /// Call id assigned by the telephony provider
    pub external_id: Option<String>,

    /// `incoming` or `outgoing`
    pub direction: String,

    /// `answered`, `missed`, `busy` or `failed`
    pub status: String,

    pub caller_number: String,
    pub callee_number: String,

    /// Staff member who handled the call, if any
    pub manager_name: Option<String>,

    /// Talk time
    pub duration_seconds: i32,

    /// Time spent ringing or queued before pickup
    pub wait_seconds: i32,

    pub started_at: DateTime<Utc>,

    /// Object path of the recording inside the recordings bucket
    pub recording_path: Option<String>,

    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Call {
    pub fn call_status(&self) -> Option<CallStatus> {
        CallStatus::parse(&self.status)
    }
}

/// Validated criteria for selecting calls.
///
/// Every field is optional; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallFilter {
    pub organization_id: Option<Uuid>,
    pub binotel_account_id: Option<Uuid>,
    pub status: Option<CallStatus>,
    pub direction: Option<CallDirection>,

    /// Manager name, matched case-insensitively
    pub manager: Option<String>,

    /// Sentiment of the call's AI analysis
    pub sentiment: Option<Sentiment>,

    /// Inclusive lower bound on `started_at`
    pub from: Option<DateTime<Utc>>,

    /// Exclusive upper bound on `started_at`
    pub to: Option<DateTime<Utc>>,

    pub min_duration: Option<i32>,

    /// Case-insensitive substring over phone numbers, manager name and notes
    pub search: Option<String>,
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub per_page: u32,
}

impl Page {
    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Query string accepted by `GET /api/calls`, `/api/calls/search` and
/// `/api/calls/stats`.
///
/// # Example
///
/// ```text
/// /api/calls?status=missed&manager=Olena&from=2025-01-01T00:00:00Z&page=2&perPage=25
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallListParams {
    pub organization_id: Option<Uuid>,
    pub binotel_account_id: Option<Uuid>,
    pub status: Option<CallStatus>,
    pub direction: Option<CallDirection>,
    pub manager: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_duration: Option<i32>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl CallListParams {
    /// Validate and split the parameters into a filter and a page.
    ///
    /// Blank strings are treated as absent.
    pub fn into_parts(self) -> Result<(CallFilter, Page), AppError> {
        let page = Page {
            number: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        };

        if page.number == 0 {
            return Err(AppError::InvalidRequest(
                "page must be 1 or greater".to_string(),
            ));
        }
        if page.per_page == 0 || page.per_page > MAX_PER_PAGE {
            return Err(AppError::InvalidRequest(format!(
                "perPage must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from >= to {
                return Err(AppError::InvalidRequest(
                    "from must be earlier than to".to_string(),
                ));
            }
        }
        if matches!(self.min_duration, Some(d) if d < 0) {
            return Err(AppError::InvalidRequest(
                "minDuration must not be negative".to_string(),
            ));
        }

        let filter = CallFilter {
            organization_id: self.organization_id,
            binotel_account_id: self.binotel_account_id,
            status: self.status,
            direction: self.direction,
            manager: non_blank(self.manager),
            sentiment: self.sentiment,
            from: self.from,
            to: self.to,
            min_duration: self.min_duration,
            search: non_blank(self.q),
        };

        Ok((filter, page))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body of `PATCH /api/calls/{id}`.
///
/// # JSON Example
///
/// ```json
/// {
///   "notes": "Customer asked for a callback on Monday",
///   "tags": ["callback", "vip"]
/// }
/// ```
///
/// An explicit `"notes": null` or empty string clears the note.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateCallRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,

    pub tags: Option<Vec<String>>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Validated annotation to apply to a call.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallAnnotation {
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl AnnotateCallRequest {
    /// Validate the request.
    ///
    /// # Rules
    ///
    /// - At least one of `notes` / `tags` must be present
    /// - Notes are trimmed; an empty note clears the column; at most 5000 characters
    /// - Tags are trimmed, blank tags dropped, duplicates removed keeping the
    ///   first occurrence; at most 20 remain
    pub fn validate(self) -> Result<CallAnnotation, AppError> {
        if self.notes.is_none() && self.tags.is_none() {
            return Err(AppError::InvalidRequest(
                "Nothing to update: provide notes or tags".to_string(),
            ));
        }

        let notes = match self.notes {
            Some(note) => {
                let note = non_blank(note);
                if let Some(ref text) = note {
                    if text.chars().count() > MAX_NOTES_CHARS {
                        return Err(AppError::InvalidRequest(format!(
                            "notes must be at most {} characters",
                            MAX_NOTES_CHARS
                        )));
                    }
                }
                Some(note)
            }
            None => None,
        };

        let tags = match self.tags {
            Some(tags) => {
                let tags = normalize_tags(tags);
                if tags.len() > MAX_TAGS {
                    return Err(AppError::InvalidRequest(format!(
                        "at most {} tags are allowed",
                        MAX_TAGS
                    )));
                }
                Some(tags)
            }
            None => None,
        };

        Ok(CallAnnotation { notes, tags })
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || seen.iter().any(|t| t == tag) {
            continue;
        }
        seen.push(tag.to_string());
    }
    seen
}

/// Call as returned to clients.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "organizationId": "3f0e...",
///   "binotelAccountId": "9b1c...",
///   "externalId": "48123377",
///   "direction": "incoming",
///   "status": "answered",
///   "callerNumber": "+380501112233",
///   "calleeNumber": "+380443334455",
///   "managerName": "Olena",
///   "durationSeconds": 184,
///   "waitSeconds": 7,
///   "startedAt": "2025-03-02T09:15:00Z",
///   "recordingUrl": "https://project.supabase.co/storage/v1/object/public/recordings/2025/03/48123377.mp3",
///   "notes": null,
///   "tags": [],
///   "createdAt": "2025-03-02T09:20:00Z",
///   "updatedAt": "2025-03-02T09:20:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub binotel_account_id: Option<Uuid>,
    pub external_id: Option<String>,
    pub direction: String,
    pub status: String,
    pub caller_number: String,
    pub callee_number: String,
    pub manager_name: Option<String>,
    pub duration_seconds: i32,
    pub wait_seconds: i32,
    pub started_at: DateTime<Utc>,
    pub recording_url: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CallResponse {
    /// Convert a database row, resolving the recording path to a public URL.
    pub fn from_call(call: Call, links: &RecordingLinks) -> Self {
        let recording_url = call
            .recording_path
            .as_deref()
            .and_then(|path| links.public_url(path));

        Self {
            id: call.id,
            organization_id: call.organization_id,
            binotel_account_id: call.binotel_account_id,
            external_id: call.external_id,
            direction: call.direction,
            status: call.status,
            caller_number: call.caller_number,
            callee_number: call.callee_number,
            manager_name: call.manager_name,
            duration_seconds: call.duration_seconds,
            wait_seconds: call.wait_seconds,
            started_at: call.started_at,
            recording_url,
            notes: call.notes,
            tags: call.tags,
            created_at: call.created_at,
            updated_at: call.updated_at,
        }
    }
}

/// Call with its transcript and AI analysis, returned by `GET /api/calls/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDetailResponse {
    #[serde(flatten)]
    pub call: CallResponse,
    pub transcript: Option<TranscriptResponse>,
    pub analysis: Option<AiAnalysisResponse>,
}
