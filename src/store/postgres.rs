//! Postgres implementation of [`CallStore`].
//!
//! Filters are appended to the query with `sqlx::QueryBuilder`, so every
//! user-supplied value is sent as a bind parameter.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::analysis::AiAnalysis;
use crate::models::call::{Call, CallAnnotation, CallFilter, Page};
use crate::models::organization::{BinotelAccount, Organization};
use crate::models::transcript::Transcript;
use crate::store::{CallStore, escape_like};

const CALL_COLUMNS: &str = "id, organization_id, binotel_account_id, external_id, direction, status, \
     caller_number, callee_number, manager_name, duration_seconds, wait_seconds, started_at, \
     recording_path, notes, tags, created_at, updated_at";

const ANALYSIS_COLUMNS: &str = "id, call_id, sentiment, sentiment_score, summary, quality_score, \
     topics, recommendations, model, created_at";

const BINOTEL_COLUMNS: &str =
    "id, organization_id, name, api_key, phone_number, is_active, created_at";

/// Store backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Append `AND ...` clauses for every constraint set on `filter`.
///
/// The query must already contain a `WHERE` clause.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CallFilter) {
    if let Some(organization_id) = filter.organization_id {
        qb.push(" AND organization_id = ").push_bind(organization_id);
    }
    if let Some(account_id) = filter.binotel_account_id {
        qb.push(" AND binotel_account_id = ").push_bind(account_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(direction) = filter.direction {
        qb.push(" AND direction = ").push_bind(direction.as_str());
    }
    if let Some(manager) = &filter.manager {
        qb.push(" AND LOWER(manager_name) = LOWER(")
            .push_bind(manager.clone())
            .push(")");
    }
    if let Some(sentiment) = filter.sentiment {
        qb.push(" AND EXISTS (SELECT 1 FROM ai_analyses a WHERE a.call_id = calls.id AND a.sentiment = ")
            .push_bind(sentiment.as_str())
            .push(")");
    }
    if let Some(from) = filter.from {
        qb.push(" AND started_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND started_at < ").push_bind(to);
    }
    if let Some(min_duration) = filter.min_duration {
        qb.push(" AND duration_seconds >= ").push_bind(min_duration);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (caller_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR callee_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR manager_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR notes ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl CallStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_calls(&self, filter: &CallFilter, page: Option<Page>) -> Result<Vec<Call>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM calls WHERE TRUE", CALL_COLUMNS));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY started_at DESC, id DESC");

        if let Some(page) = page {
            qb.push(" LIMIT ")
                .push_bind(page.limit())
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        let calls = qb.build_query_as::<Call>().fetch_all(&self.pool).await?;
        Ok(calls)
    }

    async fn count_calls(&self, filter: &CallFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM calls WHERE TRUE");
        push_filters(&mut qb, filter);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_call(&self, id: Uuid) -> Result<Option<Call>, AppError> {
        let call = sqlx::query_as::<_, Call>(&format!("SELECT {} FROM calls WHERE id = $1", CALL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(call)
    }

    async fn annotate_call(&self, id: Uuid, annotation: &CallAnnotation) -> Result<Option<Call>, AppError> {
        // $1 says whether notes were provided at all, so an explicit null can clear them.
        let call = sqlx::query_as::<_, Call>(&format!(
            r#"
            UPDATE calls
            SET notes = CASE WHEN $1 THEN $2 ELSE notes END,
                tags = COALESCE($3, tags),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            CALL_COLUMNS
        ))
        .bind(annotation.notes.is_some())
        .bind(annotation.notes.clone().flatten())
        .bind(annotation.tags.clone())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if call.is_some() {
            tracing::info!(call_id = %id, "call annotated");
        }
        Ok(call)
    }

    async fn get_transcript(&self, call_id: Uuid) -> Result<Option<Transcript>, AppError> {
        let transcript = sqlx::query_as::<_, Transcript>(
            "SELECT id, call_id, language, text, segments, created_at FROM transcripts WHERE call_id = $1",
        )
        .bind(call_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transcript)
    }

    async fn get_analysis(&self, call_id: Uuid) -> Result<Option<AiAnalysis>, AppError> {
        let analysis = sqlx::query_as::<_, AiAnalysis>(&format!(
            "SELECT {} FROM ai_analyses WHERE call_id = $1",
            ANALYSIS_COLUMNS
        ))
        .bind(call_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(analysis)
    }

    async fn list_analyses(&self, call_ids: &[Uuid]) -> Result<Vec<AiAnalysis>, AppError> {
        if call_ids.is_empty() {
            return Ok(Vec::new());
        }

        let analyses = sqlx::query_as::<_, AiAnalysis>(&format!(
            "SELECT {} FROM ai_analyses WHERE call_id = ANY($1)",
            ANALYSIS_COLUMNS
        ))
        .bind(call_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(analyses)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError> {
        let organizations = sqlx::query_as::<_, Organization>(
            "SELECT id, name, slug, created_at FROM organizations ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(organizations)
    }

    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, slug, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    async fn list_binotel_accounts(&self, organization_id: Option<Uuid>) -> Result<Vec<BinotelAccount>, AppError> {
        let accounts = sqlx::query_as::<_, BinotelAccount>(&format!(
            r#"
            SELECT {}
            FROM binotel_accounts
            WHERE ($1::uuid IS NULL OR organization_id = $1)
            ORDER BY name, id
            "#,
            BINOTEL_COLUMNS
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    async fn get_binotel_account(&self, id: Uuid) -> Result<Option<BinotelAccount>, AppError> {
        let account = sqlx::query_as::<_, BinotelAccount>(&format!(
            "SELECT {} FROM binotel_accounts WHERE id = $1",
            BINOTEL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }
}
