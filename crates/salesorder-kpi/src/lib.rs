//! # Sales Order KPI
//!
//! The order list of a sales-order browser, minus the UI: KPI aggregation over the
//! visible page, customer-name enrichment through a session cache, and the filter and
//! search composition that drives both.
//!
//! ## Core Components
//!
//! - **[model]**: Order headers, details and customer names as decoded from OData v2.
//! - **[kpi]**: [`compute_kpis`](kpi::compute_kpis), the four headline figures of a page.
//! - **[filter]**: Filter bar and free-text search, rendered to `$filter` or evaluated in memory.
//! - **[customer_actor]**: The session's customer-name cache, a
//!   [`CacheActor`](lookup_framework::CacheActor) over [`CustomerName`](model::CustomerName).
//! - **[resolver]**: Turns a page into a stream of [`RowPatch`](resolver::RowPatch)es.
//! - **[clients]**: [`CustomerClient`](clients::CustomerClient) plus the OData and in-memory sources.
//! - **[lifecycle]**: [`OrderListSession`](lifecycle::OrderListSession), which ties it together.
//!
//! ## Quick Start
//!
//! ```rust
//! use salesorder_kpi::demo::{demo_directory, demo_order_source};
//! use salesorder_kpi::lifecycle::{OrderListSession, SessionSettings};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = OrderListSession::new(
//!         Arc::new(demo_order_source()),
//!         Arc::new(demo_directory()),
//!         SessionSettings::default(),
//!     );
//!
//!     session.refresh().await?;
//!     session.settle().await;
//!
//!     let state = session.current();
//!     assert_eq!(state.kpis.total_orders, 6);
//!     assert_eq!(state.rows[0].customer_label(), "17100001 - Domestic US Customer 1");
//!
//!     session.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod demo;
pub mod filter;
pub mod kpi;
pub mod lifecycle;
pub mod model;
pub mod resolver;
pub mod value_help;
pub mod view_model;
