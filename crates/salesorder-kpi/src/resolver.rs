//! # Customer Name Resolver
//!
//! Back-fills customer display names for a freshly loaded page. Every distinct customer
//! on the page produces exactly one [`RowPatch`]: cached names are patched in straight
//! away, the rest as their lookups complete, in whatever order that happens.
//!
//! Nothing here fails the page. A lookup that fails remotely comes back as the id
//! placeholder; a cache that has gone away is logged and its customers stay unpatched.
use crate::clients::CustomerClient;
use crate::model::{CustomerId, CustomerName, Epoch, OrderRecord};
use lookup_framework::Source;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A resolved name for every row of `epoch` sold to `customer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPatch {
    pub epoch: Epoch,
    pub customer_id: CustomerId,
    pub display_name: String,
    pub source: Source,
}

impl RowPatch {
    pub fn new(epoch: Epoch, name: CustomerName, source: Source) -> Self {
        Self {
            epoch,
            customer_id: name.id,
            display_name: name.name,
            source,
        }
    }
}

/// Distinct non-blank customers of a page, in order of first appearance.
pub fn distinct_customers(rows: &[OrderRecord]) -> Vec<CustomerId> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.customer_id())
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Starts name resolution for a page and returns the stream of patches.
///
/// The receiver closes once every customer has been patched or given up on.
pub fn resolve_names(
    rows: &[OrderRecord],
    client: &CustomerClient,
    epoch: Epoch,
) -> mpsc::UnboundedReceiver<RowPatch> {
    let customers = distinct_customers(rows);
    let (tx, rx) = mpsc::unbounded_channel();
    let client = client.clone();

    tokio::spawn(async move {
        let mut lookups = JoinSet::new();
        let mut cached = 0usize;

        for id in customers {
            match client.cached_name(id.clone()).await {
                Ok(Some(name)) => {
                    cached += 1;
                    let _ = tx.send(RowPatch::new(epoch, name, Source::Cache));
                }
                Ok(None) => {
                    let client = client.clone();
                    let tx = tx.clone();
                    lookups.spawn(async move {
                        match client.display_name(id.clone()).await {
                            Ok(resolved) => {
                                let patch = RowPatch::new(epoch, resolved.value, resolved.source);
                                let _ = tx.send(patch);
                            }
                            Err(e) => {
                                warn!(%epoch, customer = %id, error = %e, "Name unavailable")
                            }
                        }
                    });
                }
                Err(e) => warn!(%epoch, customer = %id, error = %e, "Customer cache unavailable"),
            }
        }

        let remote = lookups.len();
        while let Some(joined) = lookups.join_next().await {
            if let Err(e) = joined {
                warn!(%epoch, error = %e, "Customer lookup task failed");
            }
        }
        debug!(%epoch, cached, remote, "Name resolution finished");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookup_framework::mock::MockClient;
    use lookup_framework::Resolved;

    fn page() -> Vec<OrderRecord> {
        vec![
            OrderRecord::new("1").sold_to("C1"),
            OrderRecord::new("2").sold_to("C2"),
            OrderRecord::new("3").sold_to("C1"),
            OrderRecord::new("4"),
            OrderRecord::new("5").sold_to(""),
        ]
    }

    async fn collect(mut rx: mpsc::UnboundedReceiver<RowPatch>) -> Vec<RowPatch> {
        let mut patches = Vec::new();
        while let Some(patch) = rx.recv().await {
            patches.push(patch);
        }
        patches.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
        patches
    }

    #[test]
    fn test_distinct_customers_skip_blank_and_repeat() {
        assert_eq!(
            distinct_customers(&page()),
            vec![CustomerId::from("C1"), CustomerId::from("C2")]
        );
    }

    #[tokio::test]
    async fn test_cached_names_skip_resolution() {
        let mut mock = MockClient::<CustomerName>::new();
        mock.expect_peek("C1".into())
            .return_ok(Some(CustomerName::new("C1".into(), "Acme")));
        mock.expect_peek("C2".into()).return_ok(None);
        mock.expect_resolve("C2".into()).return_ok(Resolved::new(
            CustomerName::new("C2".into(), "Globex"),
            Source::Remote,
        ));

        let client = CustomerClient::new(mock.client());
        let patches = collect(resolve_names(&page(), &client, Epoch(7))).await;

        assert_eq!(
            patches,
            vec![
                RowPatch {
                    epoch: Epoch(7),
                    customer_id: "C1".into(),
                    display_name: "Acme".into(),
                    source: Source::Cache,
                },
                RowPatch {
                    epoch: Epoch(7),
                    customer_id: "C2".into(),
                    display_name: "Globex".into(),
                    source: Source::Remote,
                },
            ]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_cache_errors_are_absorbed() {
        let mut mock = MockClient::<CustomerName>::new();
        mock.expect_peek("C1".into())
            .return_err(lookup_framework::FrameworkError::ActorClosed);
        mock.expect_peek("C2".into()).return_ok(None);
        mock.expect_resolve("C2".into())
            .return_err(lookup_framework::FrameworkError::ActorDropped);

        let client = CustomerClient::new(mock.client());
        let patches = collect(resolve_names(&page(), &client, Epoch(1))).await;

        assert!(patches.is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_page_without_customers_closes_immediately() {
        let mock = MockClient::<CustomerName>::new();
        let client = CustomerClient::new(mock.client());
        let rows = vec![OrderRecord::new("1")];
        assert!(collect(resolve_names(&rows, &client, Epoch(1))).await.is_empty());
        mock.verify();
    }
}
