//! Domain layer - Core reconciliation logic and entities

pub mod directory;
pub mod error;
pub mod mapping;
pub mod sync;
pub mod team;

pub use directory::{DirectoryConnector, DirectoryEntry, DirectorySession, EmailSet};
pub use error::DomainError;
pub use mapping::{OrgId, OrganizationMapping, TeamSpec};
pub use sync::{PassError, PassReport, SyncEngine, SyncError, SyncSettings};
pub use team::{OrgUser, RemoteTeam, RemoteTeamId, TeamDirectory};
