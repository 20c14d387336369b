//! Transcript data models.
//!
//! Transcripts are produced by the upstream speech-to-text pipeline; this
//! service only exposes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// One utterance of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Speaker label, e.g. `manager` or `client`
    pub speaker: String,

    /// Offset from the start of the recording, in seconds
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Represents a transcript record from the database.
///
/// Maps to the `transcripts` table; at most one transcript exists per call.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transcript {
    pub id: Uuid,
    pub call_id: Uuid,
    pub language: Option<String>,

    /// Full text
    pub text: String,

    /// Speaker-separated utterances, stored as JSONB
    pub segments: Json<Vec<TranscriptSegment>>,
    pub created_at: DateTime<Utc>,
}

/// Transcript as returned to clients.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "7a2c...",
///   "callId": "550e8400-e29b-41d4-a716-446655440000",
///   "language": "uk",
///   "text": "Hello, how can I help?...",
///   "segments": [
///     { "speaker": "manager", "start": 0.0, "end": 2.4, "text": "Hello, how can I help?" }
///   ],
///   "createdAt": "2025-03-02T09:21:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub id: Uuid,
    pub call_id: Uuid,
    pub language: Option<String>,
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub created_at: DateTime<Utc>,
}

impl From<Transcript> for TranscriptResponse {
    fn from(transcript: Transcript) -> Self {
        Self {
            id: transcript.id,
            call_id: transcript.call_id,
            language: transcript.language,
            text: transcript.text,
            segments: transcript.segments.0,
            created_at: transcript.created_at,
        }
    }
}
