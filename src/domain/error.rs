use thiserror::Error;

/// Errors raised by the adapters around the reconciliation core
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("LDAP connect error: {message}")]
    DirectoryConnect { message: String },

    #[error("LDAP bind error: {message}")]
    DirectoryBind { message: String },

    #[error("LDAP search failed: {message}")]
    DirectorySearch { message: String },

    #[error("Remote API error{}: {message}", status_suffix(.status))]
    Remote { status: Option<u16>, message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn directory_connect(message: impl Into<String>) -> Self {
        Self::DirectoryConnect {
            message: message.into(),
        }
    }

    pub fn directory_bind(message: impl Into<String>) -> Self {
        Self::DirectoryBind {
            message: message.into(),
        }
    }

    pub fn directory_search(message: impl Into<String>) -> Self {
        Self::DirectorySearch {
            message: message.into(),
        }
    }

    /// Transport-level failure with no HTTP status (timeout, refused, decode)
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// HTTP status returned by the remote API, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("sync schedule is empty");
        assert_eq!(error.to_string(), "Configuration error: sync schedule is empty");
    }

    #[test]
    fn test_directory_errors_are_distinguishable() {
        let connect = DomainError::directory_connect("connection refused");
        let bind = DomainError::directory_bind("invalid credentials");
        let search = DomainError::directory_search("no such object");

        assert_eq!(connect.to_string(), "LDAP connect error: connection refused");
        assert_eq!(bind.to_string(), "LDAP bind error: invalid credentials");
        assert_eq!(search.to_string(), "LDAP search failed: no such object");
        assert_ne!(connect, bind);
    }

    #[test]
    fn test_remote_error_with_status() {
        let error = DomainError::remote_status(403, "permission denied");
        assert_eq!(error.to_string(), "Remote API error (HTTP 403): permission denied");
        assert_eq!(error.status(), Some(403));
    }

    #[test]
    fn test_remote_error_without_status() {
        let error = DomainError::remote("operation timed out");
        assert_eq!(error.to_string(), "Remote API error: operation timed out");
        assert_eq!(error.status(), None);
    }
}
