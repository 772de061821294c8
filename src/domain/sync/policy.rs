//! Membership precedence and validity rules

use std::collections::HashSet;

use crate::domain::directory::EmailSet;
use crate::domain::team::OrgUser;

/// Emails known to one remote organization, taken once per pass
#[derive(Debug, Clone, Default)]
pub struct RemoteUserDirectory {
    emails: HashSet<String>,
}

impl RemoteUserDirectory {
    pub fn from_users(users: impl IntoIterator<Item = OrgUser>) -> Self {
        Self {
            emails: users
                .into_iter()
                .map(|u| u.email)
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// The desired admins and members of one team
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    members: EmailSet,
    admins: EmailSet,
}

impl Membership {
    /// Apply admin precedence: anyone resolved as admin is never also a member
    pub fn resolve(raw_members: EmailSet, raw_admins: EmailSet) -> Self {
        let mut members = raw_members;
        members.retain(|email| !raw_admins.contains(email));

        Self {
            members,
            admins: raw_admins,
        }
    }

    /// Drop every email the remote organization does not know about.
    /// Returns the dropped emails.
    pub fn retain_known(&mut self, known: &RemoteUserDirectory) -> Vec<String> {
        let mut dropped = self.admins.retain(|email| known.contains(email));
        dropped.extend(self.members.retain(|email| known.contains(email)));
        dropped
    }

    pub fn members(&self) -> &[String] {
        self.members.as_slice()
    }

    pub fn admins(&self) -> &[String] {
        self.admins.as_slice()
    }
}
