//! [`LookupEntity`] implementation for [`CustomerName`].

use crate::clients::CustomerDirectory;
use crate::customer_actor::CustomerError;
use crate::model::{CustomerId, CustomerName};
use async_trait::async_trait;
use lookup_framework::LookupEntity;
use std::sync::Arc;

/// The directory the cache actor fetches from.
pub type CustomerContext = Arc<dyn CustomerDirectory>;

#[async_trait]
impl LookupEntity for CustomerName {
    type Key = CustomerId;
    type Context = CustomerContext;
    type Error = CustomerError;

    async fn fetch(key: &CustomerId, ctx: &CustomerContext) -> Result<Self, CustomerError> {
        let payload = ctx.lookup(key).await?;
        Ok(CustomerName::new(key.clone(), payload.display_name(key)))
    }

    fn placeholder(key: &CustomerId) -> Self {
        CustomerName::placeholder(key)
    }
}
