//! # Lookup Framework
//!
//! This crate provides the building blocks for session-scoped lookup caches in Rust: a
//! value is fetched from a remote source the first time its key is asked for, and every
//! later request for that key is answered from memory. The cache is owned by an actor, so
//! resolutions that complete out of order never race on shared state.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Entity Layer** ([`LookupEntity`]) - How a value is fetched and what stands in for it
//!    when the fetch fails
//! 2. **Runtime Layer** ([`CacheActor`]) - Sequential message processing, spawned fetches,
//!    coalescing of concurrent requests for the same key
//! 3. **Interface Layer** ([`CacheClient`], [`LookupClient`]) - Type-safe communication
//!
//! ## Guarantees
//!
//! - **Append-only**: a resolved key keeps its value for the lifetime of the actor.
//! - **At most one fetch per key**: concurrent `resolve` calls for an unresolved key share
//!   one in-flight fetch.
//! - **Failures degrade**: a failed fetch caches [`LookupEntity::placeholder`] and is never
//!   retried; callers see [`Source::Placeholder`] instead of an error.
//! - **No cancellation**: a spawned fetch always runs to completion and populates the cache,
//!   even if every caller has gone away.
//!
//! ## Context Injection Pattern
//!
//! The remote client is injected at **runtime** via `run()`, not at construction time:
//!
//! ```rust
//! use lookup_framework::{CacheActor, LookupEntity};
//! use async_trait::async_trait;
//! use std::collections::HashMap;
//!
//! #[derive(Clone, Debug)] struct Region(String);
//! #[derive(Debug, thiserror::Error)] #[error("unknown region")] struct RegionError;
//!
//! #[async_trait]
//! impl LookupEntity for Region {
//!     type Key = String;
//!     type Context = HashMap<String, String>;
//!     type Error = RegionError;
//!
//!     async fn fetch(key: &String, ctx: &Self::Context) -> Result<Self, Self::Error> {
//!         ctx.get(key).cloned().map(Region).ok_or(RegionError)
//!     }
//!     fn placeholder(key: &String) -> Self { Region(key.clone()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = CacheActor::<Region>::new(10);
//!     let directory = HashMap::from([("EU".to_string(), "Europe".to_string())]);
//!     let handle = tokio::spawn(actor.run(directory));
//!
//!     let eu = client.resolve("EU".to_string()).await.unwrap();
//!     assert_eq!(eu.value.0, "Europe");
//!
//!     // Unknown keys degrade to the placeholder
//!     let xx = client.resolve("XX".to_string()).await.unwrap();
//!     assert_eq!(xx.value.0, "XX");
//!
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module hands out a real [`CacheClient`] answered from scripted
//! expectations, for testing code that sits on top of a cache without a remote source.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::CacheActor;
pub use client::CacheClient;
pub use client_trait::LookupClient;
pub use entity::LookupEntity;
pub use error::FrameworkError;
pub use message::{CacheRequest, Resolved, Response, Source};
