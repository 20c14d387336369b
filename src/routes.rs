//! HTTP router.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// # Routes
///
/// Public:
/// - `GET /health`
/// - `POST /api/auth/login`
/// - `GET /api/calls`, `/api/calls/search`, `/api/calls/stats`
/// - `GET /api/calls/{id}`, `/api/calls/{id}/transcript`, `/api/calls/{id}/analysis`
/// - `GET /api/organizations`, `/api/organizations/{id}`,
///   `/api/organizations/{id}/binotel-accounts`
/// - `GET /api/binotel-accounts`, `/api/binotel-accounts/{id}`
///
/// Session required:
/// - `PATCH /api/calls/{id}`
/// - `GET /api/auth/session`
pub fn router(state: AppState) -> Router {
    // Routes that require a session token
    let authenticated_routes = Router::new()
        .route("/api/calls/{id}", patch(handlers::calls::annotate_call))
        .route("/api/auth/session", get(handlers::auth::current_session))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/auth/login", post(handlers::auth::login))
        // Call routes
        .route("/api/calls", get(handlers::calls::list_calls))
        .route("/api/calls/search", get(handlers::calls::search_calls))
        .route("/api/calls/stats", get(handlers::calls::call_stats))
        .route("/api/calls/{id}", get(handlers::calls::get_call))
        .route(
            "/api/calls/{id}/transcript",
            get(handlers::calls::get_call_transcript),
        )
        .route(
            "/api/calls/{id}/analysis",
            get(handlers::calls::get_call_analysis),
        )
        // Tenant routes
        .route(
            "/api/organizations",
            get(handlers::organizations::list_organizations),
        )
        .route(
            "/api/organizations/{id}",
            get(handlers::organizations::get_organization),
        )
        .route(
            "/api/organizations/{id}/binotel-accounts",
            get(handlers::organizations::list_organization_accounts),
        )
        .route(
            "/api/binotel-accounts",
            get(handlers::organizations::list_binotel_accounts),
        )
        .route(
            "/api/binotel-accounts/{id}",
            get(handlers::organizations::get_binotel_account),
        );

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
