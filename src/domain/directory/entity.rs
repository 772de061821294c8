//! Directory search types

use std::collections::{HashMap, HashSet};

/// Search scope relative to the base DN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Only the base entry itself
    Base,
    /// Direct children of the base entry
    OneLevel,
    /// The base entry and everything below it
    #[default]
    Subtree,
}

/// A search against the directory. Aliases are never dereferenced and no
/// size or time limit is requested from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub base_dn: String,
    pub scope: SearchScope,
    pub filter: String,
    pub attributes: Vec<String>,
}

impl SearchRequest {
    /// Whole-subtree search for a single attribute
    pub fn subtree(
        base_dn: impl Into<String>,
        filter: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            base_dn: base_dn.into(),
            scope: SearchScope::Subtree,
            filter: filter.into(),
            attributes: vec![attribute.into()],
        }
    }
}

/// An entry returned by a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Distinguished Name
    pub dn: String,
    /// Attributes (all values are multi-valued)
    pub attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Values of an attribute. Attribute names are matched case-insensitively,
    /// as LDAP servers may echo them back in a different case.
    pub fn values(&self, name: &str) -> &[String] {
        if let Some(values) = self.attributes.get(name) {
            return values;
        }

        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }
}

/// An ordered set of email addresses.
///
/// Emails are compared exactly as the directory returns them. Iteration
/// order is the order of first insertion.
#[derive(Debug, Clone, Default)]
pub struct EmailSet {
    emails: Vec<String>,
    index: HashSet<String>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an email, returning false if it was already present
    pub fn insert(&mut self, email: impl Into<String>) -> bool {
        let email = email.into();

        if self.index.contains(&email) {
            return false;
        }

        self.index.insert(email.clone());
        self.emails.push(email);
        true
    }

    pub fn contains(&self, email: &str) -> bool {
        self.index.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.emails
    }

    /// Keep only the emails matching the predicate, returning the removed ones
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let (kept, removed): (Vec<String>, Vec<String>) =
            self.emails.drain(..).partition(|e| keep(e.as_str()));

        for email in &removed {
            self.index.remove(email);
        }
        self.emails = kept;

        removed
    }

    pub fn into_vec(self) -> Vec<String> {
        self.emails
    }
}

impl PartialEq for EmailSet {
    fn eq(&self, other: &Self) -> bool {
        self.emails == other.emails
    }
}

impl Eq for EmailSet {}

impl<S: Into<String>> FromIterator<S> for EmailSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for EmailSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for email in iter {
            self.insert(email);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_set_collapses_duplicates_in_first_seen_order() {
        let set: EmailSet = ["b@x.com", "a@x.com", "b@x.com", "c@x.com", "a@x.com"]
            .into_iter()
            .collect();

        assert_eq!(set.as_slice(), ["b@x.com", "a@x.com", "c@x.com"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_email_set_is_case_sensitive() {
        let set: EmailSet = ["Alice@x.com", "alice@x.com"].into_iter().collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains("Alice@x.com"));
        assert!(!set.contains("ALICE@x.com"));
    }

    #[test]
    fn test_email_set_retain_returns_removed() {
        let mut set: EmailSet = ["a@x.com", "b@x.com", "c@x.com"].into_iter().collect();

        let removed = set.retain(|e| e != "b@x.com");

        assert_eq!(removed, vec!["b@x.com".to_string()]);
        assert_eq!(set.as_slice(), ["a@x.com", "c@x.com"]);
        assert!(!set.contains("b@x.com"));
        assert!(set.insert("b@x.com"));
    }

    #[test]
    fn test_entry_values_case_insensitive_attribute() {
        let entry = DirectoryEntry::new("uid=alice,ou=people,dc=example,dc=com")
            .with_attribute("Mail", ["alice@example.com"]);

        assert_eq!(entry.values("mail"), ["alice@example.com"]);
        assert!(entry.values("cn").is_empty());
    }

    #[test]
    fn test_subtree_request() {
        let request = SearchRequest::subtree("dc=example,dc=com", "(uid=*)", "mail");

        assert_eq!(request.scope, SearchScope::Subtree);
        assert_eq!(request.attributes, vec!["mail".to_string()]);
    }
}
