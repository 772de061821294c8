//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::SyncTrigger;

/// Application state shared by the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<dyn SyncTrigger>,
}

impl AppState {
    pub fn new(sync: Arc<dyn SyncTrigger>) -> Self {
        Self { sync }
    }
}
