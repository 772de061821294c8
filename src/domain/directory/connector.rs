//! Directory connection traits

use async_trait::async_trait;

use super::entity::{DirectoryEntry, SearchRequest};
use crate::domain::DomainError;

/// Opens connections to the directory server
#[async_trait]
pub trait DirectoryConnector: Send + Sync + std::fmt::Debug {
    /// Open a new, unbound connection.
    ///
    /// Fails with [`DomainError::DirectoryConnect`].
    async fn connect(&self) -> Result<Box<dyn DirectorySession>, DomainError>;
}

/// An open directory connection
#[async_trait]
pub trait DirectorySession: Send {
    /// Authenticate the connection. Fails with [`DomainError::DirectoryBind`].
    async fn bind(&mut self, bind_dn: &str, password: &str) -> Result<(), DomainError>;

    /// Run a search. Fails with [`DomainError::DirectorySearch`].
    async fn search(&mut self, request: &SearchRequest) -> Result<Vec<DirectoryEntry>, DomainError>;

    /// Unbind and release the connection
    async fn close(self: Box<Self>);
}
