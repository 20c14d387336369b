//! AI analysis data models.
//!
//! Analyses are generated upstream (sentiment, summary, quality scoring) and
//! attached one-to-one to calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall tone of a call as judged by the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

/// Represents an AI analysis record from the database.
///
/// # Database Table
///
/// Maps to the `ai_analyses` table.
///
/// - `sentiment_score` ranges from -1.0 (hostile) to 1.0 (delighted)
/// - `quality_score` ranges from 0 to 100 and is absent for calls the model
///   could not grade (e.g. voicemail)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AiAnalysis {
    pub id: Uuid,
    pub call_id: Uuid,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub summary: String,
    pub quality_score: Option<f64>,
    pub topics: Vec<String>,
    pub recommendations: Option<String>,

    /// Name of the model that produced the analysis
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AiAnalysis {
    pub fn sentiment(&self) -> Option<Sentiment> {
        Sentiment::parse(&self.sentiment)
    }
}

/// AI analysis as returned to clients.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "c41e...",
///   "callId": "550e8400-e29b-41d4-a716-446655440000",
///   "sentiment": "positive",
///   "sentimentScore": 0.72,
///   "summary": "Client confirmed the order and asked about delivery.",
///   "qualityScore": 88.0,
///   "topics": ["order", "delivery"],
///   "recommendations": null,
///   "model": "gpt-4o-mini",
///   "createdAt": "2025-03-02T09:22:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisResponse {
    pub id: Uuid,
    pub call_id: Uuid,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub summary: String,
    pub quality_score: Option<f64>,
    pub topics: Vec<String>,
    pub recommendations: Option<String>,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AiAnalysis> for AiAnalysisResponse {
    fn from(analysis: AiAnalysis) -> Self {
        Self {
            id: analysis.id,
            call_id: analysis.call_id,
            sentiment: analysis.sentiment,
            sentiment_score: analysis.sentiment_score,
            summary: analysis.summary,
            quality_score: analysis.quality_score,
            topics: analysis.topics,
            recommendations: analysis.recommendations,
            model: analysis.model,
            created_at: analysis.created_at,
        }
    }
}
