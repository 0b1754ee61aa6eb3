//! The two remote seams of the order list: where order headers come from and where
//! customer names are looked up. [`ODataClient`](crate::clients::ODataClient) implements
//! both against the real services; the in-memory sources stand in for demos and tests.
use crate::filter::OrderQuery;
use crate::model::{CustomerId, CustomerPayload, OrderDetail, OrderPage, SalesOrderId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by an order source or customer directory.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected OData payload.
    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A required setting is missing.
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Reads one page of order headers.
    async fn fetch_page(&self, query: &OrderQuery) -> Result<OrderPage, SourceError>;

    /// Reads one order with its items. `Ok(None)` when no such order exists.
    async fn fetch_order(&self, id: &SalesOrderId) -> Result<Option<OrderDetail>, SourceError>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn lookup(&self, id: &CustomerId) -> Result<CustomerPayload, SourceError>;
}
