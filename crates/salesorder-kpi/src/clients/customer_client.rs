//! # Customer Client
//!
//! Provides a high-level API for the customer-name cache.
//! It wraps a `CacheClient<CustomerName>` and exposes domain-specific methods.
use crate::customer_actor::CustomerError;
use crate::model::{CustomerId, CustomerName};
use async_trait::async_trait;
use lookup_framework::{CacheClient, FrameworkError, LookupClient, Resolved};
use tracing::{debug, instrument};

/// Client for the session's customer-name cache.
#[derive(Clone)]
pub struct CustomerClient {
    inner: CacheClient<CustomerName>,
}

impl CustomerClient {
    pub fn new(inner: CacheClient<CustomerName>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LookupClient<CustomerName> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &CacheClient<CustomerName> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CustomerError::ActorCommunicationError(e.to_string())
    }
}

impl CustomerClient {
    /// The customer's display name, looked up remotely on first use.
    ///
    /// A failed lookup is not an error here: the cache answers with the id as the name
    /// and [`Source::Placeholder`](lookup_framework::Source::Placeholder).
    #[instrument(skip(self))]
    pub async fn display_name(
        &self,
        id: CustomerId,
    ) -> Result<Resolved<CustomerName>, CustomerError> {
        self.resolve(id).await
    }

    /// The cached display name, without any remote call.
    #[instrument(skip(self))]
    pub async fn cached_name(&self, id: CustomerId) -> Result<Option<CustomerName>, CustomerError> {
        self.peek(id).await
    }

    /// Number of cached customers.
    #[instrument(skip(self))]
    pub async fn cache_size(&self) -> Result<usize, CustomerError> {
        debug!("Sending request");
        self.inner.len().await.map_err(Self::map_error)
    }
}
