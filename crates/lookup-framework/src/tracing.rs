//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate for any binary
//! built on this framework.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: Startup, request channel closure, shutdown with final cache size
//! - **Cache Operations**: Peek hits/misses, coalesced resolutions, inserts
//! - **Fetch Outcomes**: `Resolved` with its source (`Cache`, `Remote`, `Placeholder`)
//! - **Failures**: `warn` with the key and the error that forced a placeholder
//!
//! ## Usage Examples
//!
//! ```bash
//! # Resolutions and shutdown only
//! RUST_LOG=info cargo run
//!
//! # Every peek and coalesced resolve
//! RUST_LOG=debug cargo run
//!
//! # Filter to the cache loop
//! RUST_LOG=lookup_framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a page of three orders for two customers reads:
//!
//! ```text
//! INFO Cache actor started entity_type="CustomerName"
//! INFO Resolved entity_type="CustomerName" key=C1 source=Remote waiters=1 size=1
//! WARN Fetch failed, caching placeholder entity_type="CustomerName" key=C2 error=...
//! INFO Resolved entity_type="CustomerName" key=C2 source=Placeholder waiters=1 size=2
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already names the source
        .compact()
        .init();
}
