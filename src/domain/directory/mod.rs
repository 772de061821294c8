//! Directory domain module
//!
//! The seam between the reconciliation core and the LDAP server: connection
//! traits, search types and filter resolution into email sets.

pub mod connector;
mod entity;
mod resolve;

pub use connector::{DirectoryConnector, DirectorySession};
pub use entity::{DirectoryEntry, EmailSet, SearchRequest, SearchScope};
pub use resolve::resolve_emails;
