//! # LookupClient Trait
//!
//! Provides a common interface for domain-specific cache clients, adding default `resolve`
//! and `peek` methods built on top of a generic `CacheClient`.
use crate::{CacheClient, FrameworkError, LookupEntity, Resolved};
use async_trait::async_trait;

/// Trait for domain-specific clients to inherit the standard cache operations.
///
/// # Example
///
/// ```rust
/// use lookup_framework::{CacheClient, FrameworkError, LookupClient, LookupEntity};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Plant { code: String }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("plant lookup failed: {0}")]
/// struct PlantError(String);
///
/// impl From<String> for PlantError {
///     fn from(s: String) -> Self { PlantError(s) }
/// }
///
/// #[async_trait]
/// impl LookupEntity for Plant {
///     type Key = String;
///     type Context = ();
///     type Error = PlantError;
///     async fn fetch(key: &String, _: &()) -> Result<Self, Self::Error> {
///         Ok(Plant { code: key.clone() })
///     }
///     fn placeholder(key: &String) -> Self { Plant { code: key.clone() } }
/// }
///
/// struct PlantClient {
///     inner: CacheClient<Plant>,
/// }
///
/// #[async_trait]
/// impl LookupClient<Plant> for PlantClient {
///     type Error = PlantError;
///
///     fn inner(&self) -> &CacheClient<Plant> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         PlantError(e.to_string())
///     }
/// }
///
/// async fn usage(client: PlantClient) {
///     // resolve() and peek() are provided automatically
///     let _ = client.resolve("1000".to_string()).await;
///     let _ = client.peek("1000".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait LookupClient<T: LookupEntity>: Send + Sync {
    /// The domain-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic CacheClient.
    fn inner(&self) -> &CacheClient<T>;

    /// Map framework errors to the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Resolve a key, fetching it if it is not cached yet.
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, key: T::Key) -> Result<Resolved<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().resolve(key).await.map_err(Self::map_error)
    }

    /// Read a cached value without fetching.
    #[tracing::instrument(skip(self))]
    async fn peek(&self, key: T::Key) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().peek(key).await.map_err(Self::map_error)
    }
}
