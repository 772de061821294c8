//! HTTP response types

pub mod error;

use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// `{"data": ...}` envelope used by every sync endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
