//! Organization mapping domain module
//!
//! Describes which Grafana teams exist in which organization and the LDAP
//! filters that decide their admins and members.

mod entity;
mod validation;

pub use entity::{OrgId, OrganizationMapping, TeamSpec};
pub use validation::{
    validate_filters, validate_org_id, validate_team_name, MappingValidationError,
};
