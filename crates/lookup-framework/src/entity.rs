//! # LookupEntity Trait
//!
//! The `LookupEntity` trait defines the contract that every cached value (customer names,
//! partner descriptions, …) must implement to be managed by the generic `CacheActor`. It
//! names the key type, the injected context used to reach the remote source, and the error
//! type of a failed fetch, and it supplies the placeholder recorded when a fetch fails.
//!
//! # Architecture Note
//! The actor never talks to a remote system itself. It asks the entity type to
//! [`fetch`](LookupEntity::fetch) a value for a key, handing it the `Context` that was
//! injected through `run()`. This keeps the cache loop generic while the entity decides
//! which endpoint, which fields and which fallback make up a value.
//!
//! # Failure Semantics
//! A failed fetch is never surfaced to waiters as an error. The actor records
//! [`LookupEntity::placeholder`] for the key instead, so the key counts as resolved for
//! the rest of the session and is not fetched again.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any cached value must implement to be managed by a `CacheActor`.
///
/// # Async & Context
/// `fetch` is async and runs in its own Tokio task, so several keys can be in flight at
/// once. The `Context` is shared between those tasks behind an `Arc`, which is why it must
/// be `Send + Sync + 'static`.
#[async_trait]
pub trait LookupEntity: Clone + Send + Sync + Debug + 'static {
    /// The key values are cached under (e.g., a customer number).
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The runtime context (remote clients, credentials) injected into the actor.
    /// Use `()` if the values can be computed locally.
    type Context: Send + Sync + 'static;

    /// The error type of a failed fetch.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the value for `key` from the remote source.
    async fn fetch(key: &Self::Key, ctx: &Self::Context) -> Result<Self, Self::Error>;

    /// The value recorded for `key` when [`fetch`](LookupEntity::fetch) fails.
    fn placeholder(key: &Self::Key) -> Self;
}
