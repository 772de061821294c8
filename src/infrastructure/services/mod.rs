//! Infrastructure services

mod sync_service;

pub use sync_service::{SyncService, SyncTrigger};

#[cfg(test)]
pub use sync_service::MockSyncTrigger;
