//! Organization and Binotel account HTTP handlers.
//!
//! - GET /api/organizations
//! - GET /api/organizations/{id}
//! - GET /api/organizations/{id}/binotel-accounts
//! - GET /api/binotel-accounts
//! - GET /api/binotel-accounts/{id}
//!
//! Binotel API keys never leave the server; responses carry a masked hint.

use axum::{Json, extract::State};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiPath, ApiQuery},
    models::organization::{BinotelAccountListParams, BinotelAccountResponse, Organization},
    state::AppState,
};

/// List all organizations, ordered by name.
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Organization>>, AppError> {
    Ok(Json(state.store.list_organizations().await?))
}

/// Get an organization by ID.
///
/// Returns 404 `organization_not_found` when it does not exist.
pub async fn get_organization(
    State(state): State<AppState>,
    ApiPath(organization_id): ApiPath<Uuid>,
) -> Result<Json<Organization>, AppError> {
    let organization = state
        .store
        .get_organization(organization_id)
        .await?
        .ok_or(AppError::NotFound("organization"))?;

    Ok(Json(organization))
}

/// List the Binotel accounts of one organization.
///
/// Returns 404 `organization_not_found` when the organization does not exist,
/// so an empty array always means "exists but has no accounts".
pub async fn list_organization_accounts(
    State(state): State<AppState>,
    ApiPath(organization_id): ApiPath<Uuid>,
) -> Result<Json<Vec<BinotelAccountResponse>>, AppError> {
    state
        .store
        .get_organization(organization_id)
        .await?
        .ok_or(AppError::NotFound("organization"))?;

    let accounts = state
        .store
        .list_binotel_accounts(Some(organization_id))
        .await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// List Binotel accounts, optionally filtered by `organizationId`.
pub async fn list_binotel_accounts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BinotelAccountListParams>,
) -> Result<Json<Vec<BinotelAccountResponse>>, AppError> {
    let accounts = state
        .store
        .list_binotel_accounts(params.organization_id)
        .await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Get a Binotel account by ID.
pub async fn get_binotel_account(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Json<BinotelAccountResponse>, AppError> {
    let account = state
        .store
        .get_binotel_account(account_id)
        .await?
        .ok_or(AppError::NotFound("binotel_account"))?;

    Ok(Json(account.into()))
}
