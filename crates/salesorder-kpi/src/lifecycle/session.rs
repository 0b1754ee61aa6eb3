use crate::clients::{CustomerClient, CustomerDirectory, OrderSource, SourceError};
use crate::customer_actor;
use crate::filter::{search_filters, Filter, OrderFilterForm, OrderQuery};
use crate::kpi::{compute_kpis, EmptyPagePolicy};
use crate::model::{Epoch, KpiSnapshot, OrderDetail, SalesOrderId};
use crate::resolver::{resolve_names, RowPatch};
use crate::value_help::{distinct_values, ValueHelp, VALUE_HELP_ROW_LIMIT};
use crate::view_model::OrderListState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}

/// Tunables of an [`OrderListSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub page_size: u32,
    pub value_help_limit: u32,
    pub cache_buffer: usize,
    pub empty_page_policy: EmptyPagePolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            value_help_limit: VALUE_HELP_ROW_LIMIT,
            cache_buffer: 32,
            empty_page_policy: EmptyPagePolicy::ResetAll,
        }
    }
}

/// What became of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was published as the current state.
    Published { epoch: Epoch, kpis: KpiSnapshot },
    /// A newer load published its page first; this one was dropped.
    Superseded { epoch: Epoch },
}

/// One user's view of the order list.
///
/// Owns the order source, the session's customer-name cache, the active filter set and
/// the published [`OrderListState`]. Every load takes the next [`Epoch`]; a page whose
/// epoch has been overtaken is dropped, and name patches for an old epoch are ignored.
pub struct OrderListSession {
    source: Arc<dyn OrderSource>,
    customer_client: CustomerClient,
    state: Arc<watch::Sender<OrderListState>>,
    filters: Mutex<Vec<Filter>>,
    epoch: AtomicU64,
    settings: SessionSettings,
    enrichment: Mutex<Vec<JoinHandle<()>>>,
    cache_handle: JoinHandle<()>,
}

impl OrderListSession {
    /// Starts the session's customer cache. Must be called inside a tokio runtime.
    pub fn new(
        source: Arc<dyn OrderSource>,
        directory: Arc<dyn CustomerDirectory>,
        settings: SessionSettings,
    ) -> Self {
        let (cache_actor, customer_client) = customer_actor::new(settings.cache_buffer);
        let cache_handle = tokio::spawn(cache_actor.run(directory));
        let (state, _) = watch::channel(OrderListState::default());

        Self {
            source,
            customer_client,
            state: Arc::new(state),
            filters: Mutex::new(Vec::new()),
            epoch: AtomicU64::new(0),
            settings,
            enrichment: Mutex::new(Vec::new()),
            cache_handle,
        }
    }

    /// Reloads the page with the active filters.
    pub async fn refresh(&self) -> Result<LoadOutcome, SessionError> {
        self.load().await
    }

    /// Replaces the active filters with the filter bar's and reloads.
    pub async fn apply_filters(&self, form: &OrderFilterForm) -> Result<LoadOutcome, SessionError> {
        self.replace_filters(form.filters());
        self.load().await
    }

    pub async fn clear_filters(&self) -> Result<LoadOutcome, SessionError> {
        self.replace_filters(Vec::new());
        self.load().await
    }

    /// Replaces the active filters with a free-text search and reloads. An empty query
    /// clears them.
    pub async fn search(&self, query: &str) -> Result<LoadOutcome, SessionError> {
        self.replace_filters(search_filters(query));
        self.load().await
    }

    /// Distinct values for a value-help dialog, narrowed by `query`.
    #[instrument(skip(self), fields(title = help.title))]
    pub async fn value_help(
        &self,
        help: ValueHelp,
        query: &str,
    ) -> Result<Vec<String>, SessionError> {
        let limit = self.settings.value_help_limit;
        let request = OrderQuery::value_help(help.field, search_filters(query), limit);
        let page = self.source.fetch_page(&request).await?;
        let values = distinct_values(&page.rows, help.field);
        debug!(rows = page.rows.len(), values = values.len(), "Value help loaded");
        Ok(values)
    }

    #[instrument(skip(self))]
    pub async fn order_detail(
        &self,
        id: &SalesOrderId,
    ) -> Result<Option<OrderDetail>, SessionError> {
        let detail = self.source.fetch_order(id).await?;
        if detail.is_none() {
            info!(order = %id, "Order not found");
        }
        Ok(detail)
    }

    pub fn subscribe(&self) -> watch::Receiver<OrderListState> {
        self.state.subscribe()
    }

    /// A snapshot of the current state.
    pub fn current(&self) -> OrderListState {
        self.state.borrow().clone()
    }

    pub fn active_filters(&self) -> Vec<Filter> {
        self.filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn customer_client(&self) -> &CustomerClient {
        &self.customer_client
    }

    /// Waits until every started name resolution has been applied.
    pub async fn settle(&self) {
        let handles = std::mem::take(
            &mut *self
                .enrichment
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Enrichment task failed");
            }
        }
    }

    /// Settles outstanding enrichment, then stops the customer cache.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        self.settle().await;
        let Self {
            customer_client,
            cache_handle,
            ..
        } = self;
        drop(customer_client);
        cache_handle
            .await
            .map_err(|e| SessionError::Shutdown(e.to_string()))?;
        info!("Session shut down");
        Ok(())
    }

    fn replace_filters(&self, filters: Vec<Filter>) {
        *self.filters.lock().unwrap_or_else(PoisonError::into_inner) = filters;
    }

    #[instrument(skip(self))]
    async fn load(&self) -> Result<LoadOutcome, SessionError> {
        let epoch = Epoch(self.epoch.fetch_add(1, Ordering::SeqCst) + 1);
        let query = OrderQuery::page(self.active_filters(), self.settings.page_size);

        let page = match self.source.fetch_page(&query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%epoch, error = %e, "Order fetch failed");
                return Err(e.into());
            }
        };

        // Only a page from a newer published load wins; a newer load that failed does not.
        let kpis = compute_kpis(&page.rows, page.total_count, self.settings.empty_page_policy);
        let records = page.rows.clone();
        let rows = records.len();
        let next = OrderListState::from_page(epoch, page, kpis);

        let published = self.state.send_if_modified(|current| {
            if current.epoch > epoch {
                return false;
            }
            *current = next;
            true
        });
        if !published {
            info!(%epoch, "Discarding superseded page");
            return Ok(LoadOutcome::Superseded { epoch });
        }

        info!(
            %epoch,
            rows,
            total_orders = kpis.total_orders,
            total_revenue = kpis.total_revenue,
            avg_order_value = kpis.avg_order_value,
            total_customers = kpis.total_customers,
            "Page published"
        );
        let patches = resolve_names(&records, &self.customer_client, epoch);
        self.track(spawn_patcher(Arc::clone(&self.state), patches));
        Ok(LoadOutcome::Published { epoch, kpis })
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self
            .enrichment
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }
}

fn spawn_patcher(
    state: Arc<watch::Sender<OrderListState>>,
    mut patches: mpsc::UnboundedReceiver<RowPatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(patch) = patches.recv().await {
            let mut changed = 0;
            state.send_if_modified(|current| {
                changed = current.apply_patch(&patch);
                changed > 0
            });
            debug!(
                epoch = %patch.epoch,
                customer = %patch.customer_id,
                source = ?patch.source,
                changed,
                "Row patch"
            );
        }
    })
}
