//! Sync domain module
//!
//! The reconciliation core: membership policy, team convergence, pass
//! orchestration and the typed error aggregate handed back to triggers.

mod engine;
mod error;
mod policy;
mod report;

pub use engine::{Convergence, SyncEngine, SyncSettings};
pub use error::{ErrorScope, SyncError};
pub use policy::{Membership, RemoteUserDirectory};
pub use report::{FailureRecord, OrgReport, PassError, PassReport};
