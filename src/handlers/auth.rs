//! Mocked login endpoints.
//!
//! - POST /api/auth/login - Exchange demo credentials for a session token
//! - GET /api/auth/session - Current user (authenticated)

use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{
    error::AppError,
    extract::ApiJson,
    middleware::auth::SessionContext,
    models::session::{LoginRequest, LoginResponse, SessionUser},
    state::AppState,
};

/// Log in with the configured demo account.
///
/// # Request Body
///
/// ```json
/// { "email": "admin@example.com", "password": "admin" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ accessToken, expiresAt, user }`
/// - **Error (400)**: email or password missing, or the body is not valid JSON
/// - **Error (401)**: wrong credentials
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.sessions.login(request, Utc::now())?))
}

/// Return the user owning the session token.
pub async fn current_session(
    Extension(session): Extension<SessionContext>,
) -> Json<SessionUser> {
    Json(session.user)
}
