//! Error types for the customer-name cache.

use crate::clients::SourceError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// The business-partner lookup failed. The cache absorbs this into a placeholder.
    #[error("Customer lookup failed: {0}")]
    LookupFailed(#[from] SourceError),

    /// An error occurred while communicating with the cache actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CustomerError {
    fn from(msg: String) -> Self {
        CustomerError::ActorCommunicationError(msg)
    }
}
