//! In-memory implementation of [`CallStore`].
//!
//! Holds a complete [`Dataset`] behind a `tokio::sync::RwLock`. Filtering and
//! ordering follow the Postgres store so both are interchangeable.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::analysis::AiAnalysis;
use crate::models::call::{Call, CallAnnotation, CallFilter, Page};
use crate::models::organization::{BinotelAccount, Organization};
use crate::models::transcript::Transcript;
use crate::store::CallStore;

/// Every record the store serves.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub organizations: Vec<Organization>,
    pub binotel_accounts: Vec<BinotelAccount>,
    pub calls: Vec<Call>,
    pub transcripts: Vec<Transcript>,
    pub analyses: Vec<AiAnalysis>,
}

/// Store over an in-process dataset.
pub struct MemoryStore {
    data: RwLock<Dataset>,
}

impl MemoryStore {
    pub fn new(data: Dataset) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

/// Whether `call` satisfies every constraint in `filter`.
fn matches(filter: &CallFilter, call: &Call, analyses: &HashMap<Uuid, &AiAnalysis>) -> bool {
    if filter.organization_id.is_some_and(|id| call.organization_id != id) {
        return false;
    }
    if filter
        .binotel_account_id
        .is_some_and(|id| call.binotel_account_id != Some(id))
    {
        return false;
    }
    if filter.status.is_some_and(|s| call.status != s.as_str()) {
        return false;
    }
    if filter.direction.is_some_and(|d| call.direction != d.as_str()) {
        return false;
    }
    if let Some(manager) = &filter.manager {
        let same = call
            .manager_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == manager.to_lowercase());
        if !same {
            return false;
        }
    }
    if let Some(sentiment) = filter.sentiment {
        let same = analyses
            .get(&call.id)
            .is_some_and(|a| a.sentiment == sentiment.as_str());
        if !same {
            return false;
        }
    }
    if filter.from.is_some_and(|from| call.started_at < from) {
        return false;
    }
    if filter.to.is_some_and(|to| call.started_at >= to) {
        return false;
    }
    if filter.min_duration.is_some_and(|d| call.duration_seconds < d) {
        return false;
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&needle));
        if !(hit(Some(call.caller_number.as_str()))
            || hit(Some(call.callee_number.as_str()))
            || hit(call.manager_name.as_deref())
            || hit(call.notes.as_deref()))
        {
            return false;
        }
    }
    true
}

impl Dataset {
    /// Matching calls, newest first.
    fn select(&self, filter: &CallFilter) -> Vec<&Call> {
        let analyses: HashMap<Uuid, &AiAnalysis> =
            self.analyses.iter().map(|a| (a.call_id, a)).collect();

        let mut calls: Vec<&Call> = self
            .calls
            .iter()
            .filter(|call| matches(filter, call, &analyses))
            .collect();
        calls.sort_by(|a, b| b.started_at.cmp(&a.started_at).then_with(|| b.id.cmp(&a.id)));
        calls
    }
}

#[async_trait]
impl CallStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_calls(&self, filter: &CallFilter, page: Option<Page>) -> Result<Vec<Call>, AppError> {
        let data = self.data.read().await;
        let selected = data.select(filter).into_iter().cloned();

        let calls = match page {
            Some(page) => selected
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            None => selected.collect(),
        };
        Ok(calls)
    }

    async fn count_calls(&self, filter: &CallFilter) -> Result<i64, AppError> {
        let data = self.data.read().await;
        Ok(data.select(filter).len() as i64)
    }

    async fn get_call(&self, id: Uuid) -> Result<Option<Call>, AppError> {
        let data = self.data.read().await;
        Ok(data.calls.iter().find(|c| c.id == id).cloned())
    }

    async fn annotate_call(&self, id: Uuid, annotation: &CallAnnotation) -> Result<Option<Call>, AppError> {
        let mut data = self.data.write().await;
        let Some(call) = data.calls.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(notes) = &annotation.notes {
            call.notes = notes.clone();
        }
        if let Some(tags) = &annotation.tags {
            call.tags = tags.clone();
        }
        call.updated_at = Utc::now();

        tracing::info!(call_id = %id, "call annotated");
        Ok(Some(call.clone()))
    }

    async fn get_transcript(&self, call_id: Uuid) -> Result<Option<Transcript>, AppError> {
        let data = self.data.read().await;
        Ok(data.transcripts.iter().find(|t| t.call_id == call_id).cloned())
    }

    async fn get_analysis(&self, call_id: Uuid) -> Result<Option<AiAnalysis>, AppError> {
        let data = self.data.read().await;
        Ok(data.analyses.iter().find(|a| a.call_id == call_id).cloned())
    }

    async fn list_analyses(&self, call_ids: &[Uuid]) -> Result<Vec<AiAnalysis>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .analyses
            .iter()
            .filter(|a| call_ids.contains(&a.call_id))
            .cloned()
            .collect())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError> {
        let data = self.data.read().await;
        let mut organizations = data.organizations.clone();
        organizations.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(organizations)
    }

    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let data = self.data.read().await;
        Ok(data.organizations.iter().find(|o| o.id == id).cloned())
    }

    async fn list_binotel_accounts(&self, organization_id: Option<Uuid>) -> Result<Vec<BinotelAccount>, AppError> {
        let data = self.data.read().await;
        let mut accounts: Vec<BinotelAccount> = data
            .binotel_accounts
            .iter()
            .filter(|a| organization_id.is_none_or(|id| a.organization_id == id))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(accounts)
    }

    async fn get_binotel_account(&self, id: Uuid) -> Result<Option<BinotelAccount>, AppError> {
        let data = self.data.read().await;
        Ok(data.binotel_accounts.iter().find(|a| a.id == id).cloned())
    }
}
