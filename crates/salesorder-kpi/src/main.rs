use clap::Parser;
use salesorder_kpi::clients::{CustomerDirectory, ODataClient, OrderSource};
use salesorder_kpi::config::{Args, Config};
use salesorder_kpi::demo::{demo_directory, demo_order_source};
use salesorder_kpi::lifecycle::{setup_tracing, OrderListSession};
use salesorder_kpi::value_help::ValueHelp;
use salesorder_kpi::view_model::OrderListState;
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let args = Args::parse();
    let config = Config::load(&args)?;
    if args.validate {
        info!(config = %args.config, "Configuration is valid");
        return Ok(());
    }

    let (source, directory): (Arc<dyn OrderSource>, Arc<dyn CustomerDirectory>) =
        if config.uses_remote_services() {
            let client = Arc::new(ODataClient::from_config(&config)?);
            (
                client.clone() as Arc<dyn OrderSource>,
                client as Arc<dyn CustomerDirectory>,
            )
        } else {
            info!("No service URLs configured, using demo data");
            (
                Arc::new(demo_order_source()) as Arc<dyn OrderSource>,
                Arc::new(demo_directory()) as Arc<dyn CustomerDirectory>,
            )
        };

    let session = OrderListSession::new(source, directory, config.session_settings());

    let span = tracing::info_span!("initial_load");
    async {
        session.refresh().await?;
        session.settle().await;
        report(&session.current());
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    if let Some(query) = args.search.as_deref() {
        let span = tracing::info_span!("search", query);
        async {
            session.search(query).await?;
            session.settle().await;
            report(&session.current());
            Ok::<_, Box<dyn std::error::Error>>(())
        }
        .instrument(span)
        .await?;
    }

    for help in ValueHelp::ALL {
        let values = session.value_help(help, "").await?;
        info!(title = help.title, count = values.len(), ?values, "Value help");
    }

    let current = session.current();
    if let Some(first) = current.rows.first() {
        let id = first.order.sales_order.clone();
        if let Some(detail) = session.order_detail(&id).await? {
            info!(
                order = %id,
                items = detail.items.len(),
                items_net = detail.items_net_total(),
                "Order detail"
            );
        }
    }

    // Shutdown session gracefully
    session.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

fn report(state: &OrderListState) {
    let kpis = state.kpis;
    info!(
        epoch = %state.epoch,
        total_orders = kpis.total_orders,
        total_revenue = kpis.total_revenue,
        avg_order_value = kpis.avg_order_value,
        total_customers = kpis.total_customers,
        "KPIs"
    );
    for row in &state.rows {
        info!(
            order = %row.order.sales_order,
            customer = %row.customer_label(),
            amount = ?row.order.total_net_amount,
            "Row"
        );
    }
}
