//! # OData v2 HTTP client
//!
//! Reads order headers from the sales-order service and customer records from the
//! business-partner service. Both are plain `GET`s with JSON responses in the v2 verbose
//! envelope; optional basic-auth credentials are sent with every request.
use crate::clients::source::{CustomerDirectory, OrderSource, SourceError};
use crate::config::{Config, Credentials};
use crate::filter::OrderQuery;
use crate::model::odata::{Collection, Envelope};
use crate::model::{CustomerId, CustomerPayload, OrderDetail, OrderPage, OrderRecord, SalesOrderId};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const DETAIL_EXPAND: &str = "to_Item,to_Item/to_ScheduleLine";
const CUSTOMER_SELECT: &str = "CustomerName,BPCustomerName";

pub struct ODataClient {
    http: reqwest::Client,
    /// Full URL of the order entity set, e.g. `.../API_SALES_ORDER_SRV/A_SalesOrder`.
    orders_url: String,
    customers_url: String,
    credentials: Option<Credentials>,
}

impl ODataClient {
    pub fn new(
        orders_url: impl Into<String>,
        customers_url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            orders_url: orders_url.into(),
            customers_url: customers_url.into(),
            credentials,
        })
    }

    /// Builds a client from the service section of the configuration.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let orders_base = config
            .sales_order_service
            .url
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured("sales_order_service.url".into()))?;
        let customers_base = config
            .business_partner_service
            .url
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured("business_partner_service.url".into()))?;

        Self::new(
            entity_set_url(orders_base, config.order_entity_set()),
            entity_set_url(customers_base, config.customer_entity_set()),
            config.credentials.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// `GET`s a JSON document. A 404 is `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Option<T>, SourceError> {
        let mut request = self
            .http
            .get(url)
            .query(query)
            .query(&[("$format", "json")])
            .header(ACCEPT, "application/json");
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            let kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else {
                "request"
            };
            warn!(url, kind, error = %e, "OData request failed");
            SourceError::Transport(format!("{kind}: {e}"))
        })?;

        let status = response.status();
        debug!(
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OData response"
        );
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "OData service returned an error");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<T>(&body)
            .map(Some)
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OrderSource for ODataClient {
    #[instrument(skip(self, query))]
    async fn fetch_page(&self, query: &OrderQuery) -> Result<OrderPage, SourceError> {
        let envelope: Envelope<Collection<OrderRecord>> = self
            .get_json(&self.orders_url, &query.to_query_pairs())
            .await?
            .ok_or_else(|| SourceError::NotFound(self.orders_url.clone()))?;
        let page = OrderPage::from(envelope.d);
        info!(rows = page.rows.len(), total = ?page.total_count, "Fetched order page");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn fetch_order(&self, id: &SalesOrderId) -> Result<Option<OrderDetail>, SourceError> {
        let url = entity_url(&self.orders_url, id.as_str());
        let query = [("$expand".to_string(), DETAIL_EXPAND.to_string())];
        let envelope: Option<Envelope<OrderDetail>> = self.get_json(&url, &query).await?;
        Ok(envelope.map(|e| e.d))
    }
}

#[async_trait]
impl CustomerDirectory for ODataClient {
    #[instrument(skip(self))]
    async fn lookup(&self, id: &CustomerId) -> Result<CustomerPayload, SourceError> {
        let url = entity_url(&self.customers_url, id.as_str());
        let query = [("$select".to_string(), CUSTOMER_SELECT.to_string())];
        let envelope: Envelope<CustomerPayload> = self
            .get_json(&url, &query)
            .await?
            .ok_or_else(|| SourceError::NotFound(format!("customer {id}")))?;
        Ok(envelope.d)
    }
}

fn entity_set_url(base: &str, entity_set: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), entity_set)
}

/// `A_Customer('17100001')`, with quotes in the key doubled.
fn entity_url(entity_set_url: &str, key: &str) -> String {
    format!("{}('{}')", entity_set_url, key.replace('\'', "''"))
}
