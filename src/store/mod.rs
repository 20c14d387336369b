//! Data access layer.
//!
//! Handlers talk to a `CallStore` and never issue SQL themselves. Two
//! implementations exist:
//!
//! - [`postgres::PgStore`]: the production database (Supabase Postgres)
//! - [`memory::MemoryStore`]: an in-process dataset serving the mocked
//!   endpoints (`DATA_SOURCE=memory`) and the integration tests

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::analysis::AiAnalysis;
use crate::models::call::{Call, CallAnnotation, CallFilter, Page};
use crate::models::organization::{BinotelAccount, Organization};
use crate::models::transcript::Transcript;

/// Demo dataset for the mocked endpoints
pub mod demo;
/// In-memory store
pub mod memory;
/// Postgres store
pub mod postgres;

/// Read access to calls and related records, plus call annotation.
///
/// Listing order is always newest `started_at` first, ties broken by id
/// descending.
#[async_trait]
pub trait CallStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Calls matching `filter`; every match when `page` is `None`.
    async fn list_calls(&self, filter: &CallFilter, page: Option<Page>) -> Result<Vec<Call>, AppError>;

    /// Number of calls matching `filter`, ignoring pagination.
    async fn count_calls(&self, filter: &CallFilter) -> Result<i64, AppError>;

    async fn get_call(&self, id: Uuid) -> Result<Option<Call>, AppError>;

    /// Apply staff annotations; `None` when the call does not exist.
    async fn annotate_call(&self, id: Uuid, annotation: &CallAnnotation) -> Result<Option<Call>, AppError>;

    async fn get_transcript(&self, call_id: Uuid) -> Result<Option<Transcript>, AppError>;

    async fn get_analysis(&self, call_id: Uuid) -> Result<Option<AiAnalysis>, AppError>;

    /// Analyses attached to any of `call_ids`.
    async fn list_analyses(&self, call_ids: &[Uuid]) -> Result<Vec<AiAnalysis>, AppError>;

    /// All organizations ordered by name.
    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError>;

    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError>;

    /// Binotel accounts ordered by name, optionally restricted to one organization.
    async fn list_binotel_accounts(&self, organization_id: Option<Uuid>) -> Result<Vec<BinotelAccount>, AppError>;

    async fn get_binotel_account(&self, id: Uuid) -> Result<Option<BinotelAccount>, AppError>;
}

/// Escape `%`, `_` and `\` so `term` matches literally inside a LIKE pattern.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
