//! Call HTTP handlers.
//!
//! This module implements the call-related API endpoints:
//! - GET /api/calls - List calls (filtered, paginated)
//! - GET /api/calls/search - Free-text search over calls
//! - GET /api/calls/stats - Aggregated statistics
//! - GET /api/calls/{id} - Call with transcript and analysis
//! - PATCH /api/calls/{id} - Annotate a call (authenticated)
//! - GET /api/calls/{id}/transcript - Transcript of a call
//! - GET /api/calls/{id}/analysis - AI analysis of a call

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::SessionContext,
    models::{
        analysis::AiAnalysisResponse,
        call::{AnnotateCallRequest, CallDetailResponse, CallFilter, CallListParams, CallResponse, Page},
        transcript::TranscriptResponse,
    },
    services::stats_service::{self, CallStats},
    state::AppState,
};

/// Header carrying the unpaginated number of matches.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

async fn list_page(
    state: &AppState,
    filter: CallFilter,
    page: Page,
) -> Result<(HeaderMap, Json<Vec<CallResponse>>), AppError> {
    let total = state.store.count_calls(&filter).await?;
    let calls = state.store.list_calls(&filter, Some(page)).await?;

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));

    let body = calls
        .into_iter()
        .map(|call| CallResponse::from_call(call, &state.recordings))
        .collect();

    Ok((headers, Json(body)))
}

/// List calls.
///
/// # Endpoint
///
/// `GET /api/calls`
///
/// # Query Parameters
///
/// `organizationId`, `binotelAccountId`, `status`, `direction`, `manager`,
/// `sentiment`, `from`, `to`, `minDuration`, `q`, `page` (default 1),
/// `perPage` (default 50, max 200).
///
/// # Response
///
/// - **Success (200 OK)**: JSON array of calls, newest first; the
///   `X-Total-Count` header holds the number of matches across all pages
/// - **Error (400)**: Invalid parameters
pub async fn list_calls(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CallListParams>,
) -> Result<(HeaderMap, Json<Vec<CallResponse>>), AppError> {
    let (filter, page) = params.into_parts()?;
    list_page(&state, filter, page).await
}

/// Search calls by phone number, manager name or notes.
///
/// # Endpoint
///
/// `GET /api/calls/search?q=0501112233`
///
/// Accepts the same parameters as the list endpoint, but `q` is required.
///
/// # Response
///
/// - **Success (200 OK)**: JSON array of matching calls
/// - **Error (400)**: `q` missing or blank
pub async fn search_calls(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CallListParams>,
) -> Result<(HeaderMap, Json<Vec<CallResponse>>), AppError> {
    let (filter, page) = params.into_parts()?;
    if filter.search.is_none() {
        return Err(AppError::InvalidRequest(
            "Search query 'q' is required".to_string(),
        ));
    }
    list_page(&state, filter, page).await
}

/// Aggregated statistics over every call matching the filter.
///
/// # Endpoint
///
/// `GET /api/calls/stats`
///
/// Accepts the list filters; pagination parameters are validated but ignored.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "totalCalls": 12,
///   "answeredCalls": 8,
///   "missedCalls": 3,
///   "answerRate": 0.667,
///   "averageDurationSeconds": 251.25,
///   "sentiment": { "positive": 2, "neutral": 2, "negative": 2 },
///   "managers": [ { "manager": "Olena Kovalenko", "totalCalls": 3, ... } ],
///   "daily": [ { "date": "2025-03-03", "totalCalls": 5, "answeredCalls": 3 } ]
/// }
/// ```
pub async fn call_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CallListParams>,
) -> Result<Json<CallStats>, AppError> {
    let (filter, _) = params.into_parts()?;

    let calls = state.store.list_calls(&filter, None).await?;
    let call_ids: Vec<Uuid> = calls.iter().map(|c| c.id).collect();
    let analyses = state.store.list_analyses(&call_ids).await?;

    tracing::debug!(calls = calls.len(), analyses = analyses.len(), "aggregating call stats");

    Ok(Json(stats_service::aggregate(&calls, &analyses)))
}

/// Get a call with its transcript and AI analysis.
///
/// # Response
///
/// - **Success (200 OK)**: call fields plus `transcript` and `analysis`
///   (each `null` when not generated yet)
/// - **Error (404)**: Call not found
pub async fn get_call(
    State(state): State<AppState>,
    ApiPath(call_id): ApiPath<Uuid>,
) -> Result<Json<CallDetailResponse>, AppError> {
    let call = state
        .store
        .get_call(call_id)
        .await?
        .ok_or(AppError::NotFound("call"))?;

    let (transcript, analysis) = tokio::try_join!(
        state.store.get_transcript(call_id),
        state.store.get_analysis(call_id),
    )?;

    Ok(Json(CallDetailResponse {
        call: CallResponse::from_call(call, &state.recordings),
        transcript: transcript.map(Into::into),
        analysis: analysis.map(Into::into),
    }))
}

/// Annotate a call with notes and tags.
///
/// # Endpoint
///
/// `PATCH /api/calls/{id}`
///
/// # Authentication
///
/// Requires a session token from `POST /api/auth/login`.
///
/// # Request Body
///
/// ```json
/// { "notes": "Call back Monday", "tags": ["callback"] }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the updated call
/// - **Error (400)**: Nothing to update or invalid annotation
/// - **Error (401)**: Missing or invalid session
/// - **Error (404)**: Call not found
pub async fn annotate_call(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    ApiPath(call_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AnnotateCallRequest>,
) -> Result<Json<CallResponse>, AppError> {
    let annotation = request.validate()?;

    let call = state
        .store
        .annotate_call(call_id, &annotation)
        .await?
        .ok_or(AppError::NotFound("call"))?;

    tracing::info!(call_id = %call_id, user = %session.user.email, "annotation saved");

    Ok(Json(CallResponse::from_call(call, &state.recordings)))
}

/// Get the transcript of a call.
///
/// # Response
///
/// - **Success (200 OK)**: the transcript
/// - **Error (404)**: `call_not_found` or `transcript_not_found`
pub async fn get_call_transcript(
    State(state): State<AppState>,
    ApiPath(call_id): ApiPath<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    ensure_call_exists(&state, call_id).await?;

    let transcript = state
        .store
        .get_transcript(call_id)
        .await?
        .ok_or(AppError::NotFound("transcript"))?;

    Ok(Json(transcript.into()))
}

/// Get the AI analysis of a call.
///
/// # Response
///
/// - **Success (200 OK)**: the analysis
/// - **Error (404)**: `call_not_found` or `analysis_not_found`
pub async fn get_call_analysis(
    State(state): State<AppState>,
    ApiPath(call_id): ApiPath<Uuid>,
) -> Result<Json<AiAnalysisResponse>, AppError> {
    ensure_call_exists(&state, call_id).await?;

    let analysis = state
        .store
        .get_analysis(call_id)
        .await?
        .ok_or(AppError::NotFound("analysis"))?;

    Ok(Json(analysis.into()))
}

async fn ensure_call_exists(state: &AppState, call_id: Uuid) -> Result<(), AppError> {
    state
        .store
        .get_call(call_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound("call"))
}
