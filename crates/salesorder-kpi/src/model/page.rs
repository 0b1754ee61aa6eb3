use crate::model::odata::Collection;
use crate::model::OrderRecord;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Monotonic load counter. Results tagged with an older epoch than the latest issued
/// load are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "epoch_{}", self.0)
    }
}

/// One fetched page of order headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPage {
    pub rows: Vec<OrderRecord>,
    /// Server-side count of all orders matching the filters, when the service reported it.
    pub total_count: Option<u64>,
}

impl OrderPage {
    pub fn new(rows: Vec<OrderRecord>, total_count: Option<u64>) -> Self {
        Self { rows, total_count }
    }
}

impl From<Collection<OrderRecord>> for OrderPage {
    fn from(collection: Collection<OrderRecord>) -> Self {
        Self::new(collection.results, collection.count)
    }
}
