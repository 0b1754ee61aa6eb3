//! # Cache Messages
//!
//! This module defines the message types used for communication between
//! the `CacheClient` and `CacheActor`, plus the [`Resolved`] answer type.

use crate::entity::LookupEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Already in the cache; no remote call was made.
    Cache,
    /// Fetched from the remote source by this resolution (or one it was coalesced with).
    Remote,
    /// The remote fetch failed and the entity's placeholder was recorded.
    Placeholder,
}

/// A value handed back by [`CacheRequest::Resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

/// Message type sent to the actor.
///
/// # Append-Only Store
/// There is no update or delete variant: once a key has a value it keeps it
/// for the lifetime of the actor.
///
/// - **Peek**: Read the cached value without triggering a fetch.
/// - **Resolve**: Return the cached value, or fetch it (coalescing with any fetch already in
///   flight for the same key).
/// - **Insert**: Seed a value. Ignored if the key is already resolved.
/// - **Len**: Number of resolved keys.
#[derive(Debug)]
pub enum CacheRequest<T: LookupEntity> {
    Peek {
        key: T::Key,
        respond_to: Response<Option<T>>,
    },
    Resolve {
        key: T::Key,
        respond_to: Response<Resolved<T>>,
    },
    Insert {
        key: T::Key,
        value: T,
        respond_to: Response<bool>,
    },
    Len {
        respond_to: Response<usize>,
    },
}
