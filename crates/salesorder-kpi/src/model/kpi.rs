use serde::Serialize;

/// Headline figures for the order list page.
///
/// Revenue and average are whole currency units, rounded half up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    pub total_orders: u64,
    pub total_revenue: i64,
    pub avg_order_value: i64,
    pub total_customers: u64,
}
