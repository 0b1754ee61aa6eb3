//! Type-safe clients: the customer-name cache client and the order/customer sources.

pub mod customer_client;
pub mod memory;
pub mod odata;
pub mod source;

pub use customer_client::*;
pub use memory::*;
pub use odata::*;
pub use source::*;
