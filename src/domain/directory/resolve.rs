//! Filter resolution

use tracing::debug;

use super::connector::DirectorySession;
use super::entity::{EmailSet, SearchRequest};
use crate::domain::DomainError;

/// Resolve a filter to the set of email attribute values of every matching
/// entry below `base_dn`.
///
/// A missing or blank filter is not an error: the result is simply empty and
/// the directory is not queried.
pub async fn resolve_emails(
    session: &mut dyn DirectorySession,
    base_dn: &str,
    filter: Option<&str>,
    email_attribute: &str,
) -> Result<EmailSet, DomainError> {
    let Some(filter) = filter.filter(|f| !f.trim().is_empty()) else {
        return Ok(EmailSet::new());
    };

    let request = SearchRequest::subtree(base_dn, filter, email_attribute);
    let entries = session.search(&request).await?;

    let mut emails = EmailSet::new();
    for entry in &entries {
        emails.extend(entry.values(email_attribute).iter().cloned());
    }

    debug!(
        filter = %filter,
        entries = entries.len(),
        emails = emails.len(),
        "Resolved directory filter"
    );

    Ok(emails)
}
