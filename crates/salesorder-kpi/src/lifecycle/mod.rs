//! # Session Lifecycle & Orchestration
//!
//! [`OrderListSession`] wires the pieces of the order list together and owns their
//! lifetimes: the order source, the customer-name cache actor and its client, the active
//! filter set, and the published [`OrderListState`](crate::view_model::OrderListState).
//!
//! ## The Load Pattern
//!
//! ```text
//! refresh / apply_filters / search / clear_filters
//!   -> next epoch -> fetch page -> compute KPIs
//!   -> publish state wholesale (unless a newer page is already published)
//!   -> resolve names -> patch rows of that epoch as lookups complete
//! ```
//!
//! Loads may overlap. The page of an older epoch is never published over a newer one,
//! and name patches carrying an older epoch are ignored by the state.
//!
//! ## Graceful Shutdown
//!
//! 1. **Settle** - await the row patchers of every load (their lookups always complete)
//! 2. **Drop the client** - closes the cache actor's request channel
//! 3. **Await the actor** - it stops once its channel is closed and nothing is pending
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber; loads log their epoch, row count and KPIs at
//! `info`, row patches at `debug`, failed lookups and fetches at `warn`.

pub mod session;

pub use lookup_framework::tracing::setup_tracing;
pub use session::*;
