//! # Domain Model
//!
//! Plain data carried through the page: order headers and details as decoded from the
//! sales-order service, customer names from the business-partner service, and the
//! derived KPI snapshot.

pub mod customer;
pub mod detail;
pub mod kpi;
pub mod odata;
pub mod order;
pub mod page;

pub use customer::*;
pub use detail::*;
pub use kpi::*;
pub use order::*;
pub use page::*;
