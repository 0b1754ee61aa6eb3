//! In-memory order source and customer directory.
//!
//! Both evaluate the same [`Filter`](crate::filter::Filter) semantics as the remote
//! service, count their calls, and can be told to fail or to answer slowly. The binary
//! uses them for its demo data; the tests use them to observe caching and ordering.
use crate::clients::source::{CustomerDirectory, OrderSource, SourceError};
use crate::filter::{matches_all, OrderQuery};
use crate::model::{
    CustomerId, CustomerPayload, OrderDetail, OrderPage, OrderRecord, SalesOrderId,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryOrderSource {
    rows: Vec<OrderRecord>,
    details: HashMap<SalesOrderId, OrderDetail>,
    latency: Duration,
    fetches: AtomicUsize,
    next_failure: Mutex<Option<SourceError>>,
}

impl InMemoryOrderSource {
    pub fn new(rows: Vec<OrderRecord>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Registers an order detail with items; other orders resolve to their bare header.
    pub fn with_detail(mut self, detail: OrderDetail) -> Self {
        self.details
            .insert(detail.header.sales_order.clone(), detail);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the next page fetch fail with `error`.
    pub fn fail_next(&self, error: SourceError) {
        *self
            .next_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSource for InMemoryOrderSource {
    async fn fetch_page(&self, query: &OrderQuery) -> Result<OrderPage, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let failure = self
            .next_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(error) = failure {
            return Err(error);
        }

        let matching: Vec<&OrderRecord> = self
            .rows
            .iter()
            .filter(|row| matches_all(&query.filters, row))
            .collect();
        let total = matching.len() as u64;
        let top = query.top.map_or(usize::MAX, |top| top as usize);
        let rows: Vec<OrderRecord> = matching.into_iter().take(top).cloned().collect();

        debug!(rows = rows.len(), total, "In-memory page");
        Ok(OrderPage::new(rows, query.inline_count.then_some(total)))
    }

    async fn fetch_order(&self, id: &SalesOrderId) -> Result<Option<OrderDetail>, SourceError> {
        if let Some(detail) = self.details.get(id) {
            return Ok(Some(detail.clone()));
        }
        Ok(self
            .rows
            .iter()
            .find(|row| &row.sales_order == id)
            .cloned()
            .map(OrderDetail::from_header))
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    customers: HashMap<CustomerId, CustomerPayload>,
    failing: HashSet<CustomerId>,
    latency: Duration,
    lookups: Mutex<Vec<CustomerId>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(mut self, id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        self.customers.insert(
            id.into(),
            CustomerPayload {
                customer_name: Some(name.into()),
                bp_customer_name: None,
            },
        );
        self
    }

    pub fn with_payload(mut self, id: impl Into<CustomerId>, payload: CustomerPayload) -> Self {
        self.customers.insert(id.into(), payload);
        self
    }

    /// Lookups for `id` fail with a 500.
    pub fn failing_for(mut self, id: impl Into<CustomerId>) -> Self {
        self.failing.insert(id.into());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn lookups_for(&self, id: &CustomerId) -> usize {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|looked_up| *looked_up == id)
            .count()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn lookup(&self, id: &CustomerId) -> Result<CustomerPayload, SourceError> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.failing.contains(id) {
            return Err(SourceError::Status {
                status: 500,
                body: format!("lookup of {id} failed"),
            });
        }
        self.customers
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("customer {id}")))
    }
}
