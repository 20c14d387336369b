//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::DataSource;
use crate::services::session_service::SessionService;
use crate::services::storage::RecordingLinks;
use crate::store::CallStore;

/// Cloned into each request by Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CallStore>,
    pub sessions: Arc<SessionService>,
    pub recordings: Arc<RecordingLinks>,
    pub data_source: DataSource,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CallStore>,
        sessions: SessionService,
        recordings: RecordingLinks,
        data_source: DataSource,
    ) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
            recordings: Arc::new(recordings),
            data_source,
        }
    }
}
