use async_trait::async_trait;
use chrono::NaiveDate;
use salesorder_kpi::clients::{InMemoryDirectory, InMemoryOrderSource, OrderSource, SourceError};
use salesorder_kpi::filter::{OrderFilterForm, OrderQuery};
use salesorder_kpi::kpi::EmptyPagePolicy;
use salesorder_kpi::lifecycle::{LoadOutcome, OrderListSession, SessionError, SessionSettings};
use salesorder_kpi::model::{
    CustomerId, KpiSnapshot, OrderDetail, OrderItem, OrderPage, OrderRecord, SalesOrderId,
};
use salesorder_kpi::value_help::ValueHelp;
use std::sync::Arc;

fn three_rows() -> Vec<OrderRecord> {
    vec![
        OrderRecord::new("1").sold_to("C1").net_amount(100.0).order_type("OR"),
        OrderRecord::new("2").sold_to("C2").net_amount(50.0).order_type("OR"),
        OrderRecord::new("3").sold_to("C1").order_type("CR"),
    ]
}

fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_customer("C1", "Acme")
        .with_customer("C2", "Globex")
}

/// Always answers with the same page, whatever the query.
struct FixedPageSource(OrderPage);

#[async_trait]
impl OrderSource for FixedPageSource {
    async fn fetch_page(&self, _query: &OrderQuery) -> Result<OrderPage, SourceError> {
        Ok(self.0.clone())
    }

    async fn fetch_order(&self, _id: &SalesOrderId) -> Result<Option<OrderDetail>, SourceError> {
        Ok(None)
    }
}

/// Full end-to-end flow: load, KPIs, enrichment, cached re-load, shutdown.
#[tokio::test]
async fn test_full_session_flow() {
    let source = Arc::new(InMemoryOrderSource::new(three_rows()));
    let directory = Arc::new(directory());
    let session =
        OrderListSession::new(source.clone(), directory.clone(), SessionSettings::default());

    let outcome = session.refresh().await.expect("Failed to load page");
    let expected = KpiSnapshot {
        total_orders: 3,
        total_revenue: 150,
        avg_order_value: 50,
        total_customers: 2,
    };
    assert!(matches!(outcome, LoadOutcome::Published { kpis, .. } if kpis == expected));

    session.settle().await;
    let state = session.current();
    assert_eq!(state.kpis, expected);
    assert!(state.is_enriched());
    let labels: Vec<String> = state.rows.iter().map(|r| r.customer_label()).collect();
    assert_eq!(labels, vec!["C1 - Acme", "C2 - Globex", "C1 - Acme"]);
    assert_eq!(directory.lookup_count(), 2, "One lookup per distinct customer");

    // A second load is served from the session cache
    session.refresh().await.expect("Failed to reload page");
    session.settle().await;
    assert!(session.current().is_enriched());
    assert_eq!(directory.lookup_count(), 2);
    assert_eq!(session.customer_client().cache_size().await.unwrap(), 2);
    assert_eq!(source.fetch_count(), 2);

    session.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_failed_lookup_shows_id_and_is_not_retried() {
    let source = Arc::new(InMemoryOrderSource::new(three_rows()));
    let directory = Arc::new(
        InMemoryDirectory::new()
            .with_customer("C1", "Acme")
            .failing_for("C2"),
    );
    let session = OrderListSession::new(source, directory.clone(), SessionSettings::default());

    session.refresh().await.unwrap();
    session.settle().await;
    let state = session.current();
    assert_eq!(state.rows[1].customer_label(), "C2");
    assert_eq!(state.rows[1].customer_name.as_deref(), Some("C2"));

    session.refresh().await.unwrap();
    session.settle().await;
    assert_eq!(directory.lookups_for(&CustomerId::from("C2")), 1);
    assert_eq!(session.current().rows[1].customer_label(), "C2");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_filters_search_and_clear_recompute_kpis() {
    let source = Arc::new(InMemoryOrderSource::new(three_rows()));
    let session = OrderListSession::new(source, Arc::new(directory()), SessionSettings::default());

    let form = OrderFilterForm {
        order_type: "OR".into(),
        ..Default::default()
    };
    session.apply_filters(&form).await.unwrap();
    let state = session.current();
    assert_eq!(state.rows.len(), 2);
    assert_eq!(state.kpis.total_revenue, 150);
    assert_eq!(state.kpis.avg_order_value, 75);
    assert_eq!(session.active_filters(), form.filters());

    // Search replaces the filter bar's filters
    session.search("3").await.unwrap();
    let state = session.current();
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.rows[0].order.sales_order.as_str(), "3");
    assert_eq!(state.kpis.total_revenue, 0);
    assert_eq!(state.kpis.total_customers, 1);

    session.clear_filters().await.unwrap();
    assert!(session.active_filters().is_empty());
    assert_eq!(session.current().rows.len(), 3);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_date_range_filter() {
    let on = |d: u32| {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    };
    let rows = vec![
        OrderRecord::new("1").ordered_on(on(4)),
        OrderRecord::new("2").ordered_on(on(5)),
        OrderRecord::new("3").ordered_on(on(6)),
        OrderRecord::new("4"),
    ];
    let session = OrderListSession::new(
        Arc::new(InMemoryOrderSource::new(rows)),
        Arc::new(InMemoryDirectory::new()),
        SessionSettings::default(),
    );

    let form = OrderFilterForm {
        date_from: NaiveDate::from_ymd_opt(2024, 1, 5),
        date_to: NaiveDate::from_ymd_opt(2024, 1, 5),
        ..Default::default()
    };
    session.apply_filters(&form).await.unwrap();
    let ids: Vec<String> = session
        .current()
        .rows
        .iter()
        .map(|r| r.order.sales_order.to_string())
        .collect();
    assert_eq!(ids, vec!["2"]);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_state() {
    let source = Arc::new(InMemoryOrderSource::new(three_rows()));
    let session =
        OrderListSession::new(source.clone(), Arc::new(directory()), SessionSettings::default());

    session.refresh().await.unwrap();
    let before = session.current();

    source.fail_next(SourceError::Status {
        status: 503,
        body: "maintenance".into(),
    });
    let result = session.refresh().await;
    assert!(matches!(
        result,
        Err(SessionError::Source(SourceError::Status { status: 503, .. }))
    ));
    assert_eq!(session.current().kpis, before.kpis);
    assert_eq!(session.current().epoch, before.epoch);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_count_overrides_total_but_not_average() {
    let rows: Vec<OrderRecord> = (0..20)
        .map(|i| OrderRecord::new(format!("{i}")).net_amount(5.0))
        .collect();
    let source = Arc::new(FixedPageSource(OrderPage::new(rows, Some(42))));
    let session = OrderListSession::new(
        source,
        Arc::new(InMemoryDirectory::new()),
        SessionSettings::default(),
    );

    session.refresh().await.unwrap();
    let state = session.current();
    assert_eq!(state.kpis.total_orders, 42);
    assert_eq!(state.kpis.total_revenue, 100);
    assert_eq!(state.kpis.avg_order_value, 5);
    assert_eq!(state.total_count, Some(42));

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_page_policies() {
    let empty = OrderPage::new(Vec::new(), Some(42));

    let reset = OrderListSession::new(
        Arc::new(FixedPageSource(empty.clone())),
        Arc::new(InMemoryDirectory::new()),
        SessionSettings::default(),
    );
    reset.refresh().await.unwrap();
    assert_eq!(reset.current().kpis, KpiSnapshot::default());
    reset.shutdown().await.unwrap();

    let keep = OrderListSession::new(
        Arc::new(FixedPageSource(empty)),
        Arc::new(InMemoryDirectory::new()),
        SessionSettings {
            empty_page_policy: EmptyPagePolicy::KeepServerTotal,
            ..Default::default()
        },
    );
    keep.refresh().await.unwrap();
    assert_eq!(
        keep.current().kpis,
        KpiSnapshot {
            total_orders: 42,
            ..Default::default()
        }
    );
    keep.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_value_help_and_order_detail() {
    let detail = OrderDetail {
        header: OrderRecord::new("1").sold_to("C1"),
        items: vec![OrderItem {
            item: "10".into(),
            net_amount: Some(100.0),
            ..Default::default()
        }],
    };
    let source = Arc::new(InMemoryOrderSource::new(three_rows()).with_detail(detail));
    let session = OrderListSession::new(source, Arc::new(directory()), SessionSettings::default());

    let customers = session.value_help(ValueHelp::CUSTOMER, "").await.unwrap();
    assert_eq!(customers, vec!["C1", "C2"]);

    let narrowed = session.value_help(ValueHelp::CUSTOMER, "2").await.unwrap();
    assert_eq!(narrowed, vec!["C2"]);

    let orders = session.value_help(ValueHelp::SALES_ORDER, "").await.unwrap();
    assert_eq!(orders, vec!["1", "2", "3"]);

    let found = session.order_detail(&"1".into()).await.unwrap().unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items_net_total(), 100.0);

    let header_only = session.order_detail(&"2".into()).await.unwrap().unwrap();
    assert!(header_only.items.is_empty());

    assert!(session.order_detail(&"404".into()).await.unwrap().is_none());

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_subscriber_sees_page_then_names() {
    let session = OrderListSession::new(
        Arc::new(InMemoryOrderSource::new(three_rows())),
        Arc::new(directory()),
        SessionSettings::default(),
    );
    let mut updates = session.subscribe();

    session.refresh().await.unwrap();
    let enriched = updates
        .wait_for(|state| state.epoch.0 == 1 && state.is_enriched())
        .await
        .expect("State sender dropped")
        .clone();
    assert_eq!(enriched.rows[0].customer_name.as_deref(), Some("Acme"));
    assert_eq!(enriched.kpis.total_customers, 2);

    session.shutdown().await.unwrap();
}
