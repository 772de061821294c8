//! Team domain module
//!
//! Teams live in the remote team-management API. The reconciliation core only
//! looks them up by name, creates missing ones and replaces their membership.

pub mod client;
mod entity;

pub use client::TeamDirectory;
pub use entity::{OrgUser, RemoteTeam, RemoteTeamId};

#[cfg(test)]
pub use client::MockTeamDirectory;
