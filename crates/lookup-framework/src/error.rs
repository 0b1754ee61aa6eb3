//! # Framework Errors
//!
//! This module defines the common error types used throughout the lookup framework.
//! Fetch failures are absorbed by the actor, so only channel failures remain.

/// Errors that can occur within the lookup framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Cache actor closed")]
    ActorClosed,
    #[error("Cache actor dropped response channel")]
    ActorDropped,
    #[error("Unexpected request: {0}")]
    Unexpected(String),
}
