//! # Customer Actor
//!
//! The session's customer-name cache: a [`CacheActor`] over [`CustomerName`], fetching
//! from a [`CustomerDirectory`](crate::clients::CustomerDirectory) injected at `run()`.
//!
//! ## Structure
//!
//! - [`entity`] - [`LookupEntity`](lookup_framework::LookupEntity) implementation for
//!   [`CustomerName`]
//! - [`error`] - [`CustomerError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use salesorder_kpi::clients::{CustomerDirectory, InMemoryDirectory};
//! use salesorder_kpi::customer_actor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = customer_actor::new(32);
//!     let directory: Arc<dyn CustomerDirectory> =
//!         Arc::new(InMemoryDirectory::new().with_customer("17100001", "Domestic US Customer 1"));
//!     tokio::spawn(actor.run(directory));
//!
//!     let name = client.display_name("17100001".into()).await?;
//!     assert_eq!(name.value.name, "Domestic US Customer 1");
//!
//!     // Unknown customers degrade to their id
//!     let unknown = client.display_name("99".into()).await?;
//!     assert_eq!(unknown.value.name, "99");
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::CustomerClient;
use crate::model::CustomerName;
use lookup_framework::CacheActor;

/// Creates a new customer-name cache actor and its client.
pub fn new(buffer: usize) -> (CacheActor<CustomerName>, CustomerClient) {
    let (actor, inner) = CacheActor::new(buffer);
    (actor, CustomerClient::new(inner))
}
