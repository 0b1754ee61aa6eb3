//! # KPI Aggregation
//!
//! Derives the four headline figures of the order list from the page that was just
//! fetched. The snapshot is recomputed from scratch for every page and replaces the
//! previous one; nothing accumulates across pages.
//!
//! | Figure | Source |
//! |--------|--------|
//! | `total_orders` | server `__count` when positive, else the page length |
//! | `total_revenue` | sum of `TotalNetAmount`, absent amounts count as zero |
//! | `avg_order_value` | unrounded revenue over the page length |
//! | `total_customers` | distinct non-blank `SoldToParty` values on the page |
//!
//! The average always divides by the rows actually on the page, even when the server
//! reports a larger total.
use crate::model::{KpiSnapshot, OrderRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What an empty page does to the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPagePolicy {
    /// Every figure is zero, whatever the server count says.
    #[default]
    ResetAll,
    /// A positive server count still sets `total_orders`; the other figures are zero.
    KeepServerTotal,
}

/// Rounds halves up: 2.5 becomes 3, -2.5 becomes -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn compute_kpis(
    rows: &[OrderRecord],
    server_total: Option<u64>,
    policy: EmptyPagePolicy,
) -> KpiSnapshot {
    let reported_total = server_total.filter(|count| *count > 0);

    if rows.is_empty() {
        return match (policy, reported_total) {
            (EmptyPagePolicy::KeepServerTotal, Some(total)) => KpiSnapshot {
                total_orders: total,
                ..KpiSnapshot::default()
            },
            _ => KpiSnapshot::default(),
        };
    }

    let revenue: f64 = rows.iter().filter_map(|row| row.total_net_amount).sum();
    let customers: HashSet<&str> = rows
        .iter()
        .filter_map(|row| row.customer_id())
        .map(|id| id.as_str())
        .collect();

    KpiSnapshot {
        total_orders: reported_total.unwrap_or(rows.len() as u64),
        total_revenue: round_half_up(revenue),
        avg_order_value: round_half_up(revenue / rows.len() as f64),
        total_customers: customers.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Vec<OrderRecord> {
        vec![
            OrderRecord::new("1").sold_to("C1").net_amount(100.0),
            OrderRecord::new("2").sold_to("C2").net_amount(50.0),
            OrderRecord::new("3").sold_to("C1"),
        ]
    }

    #[test]
    fn test_three_row_example() {
        let kpis = compute_kpis(&sample_page(), None, EmptyPagePolicy::ResetAll);
        assert_eq!(
            kpis,
            KpiSnapshot {
                total_orders: 3,
                total_revenue: 150,
                avg_order_value: 50,
                total_customers: 2,
            }
        );
    }

    #[test]
    fn test_wire_page_decodes_and_aggregates() {
        use crate::model::odata::{Collection, Envelope};

        let body = serde_json::json!({"d": {"results": [
            {"SalesOrder": "1", "SoldToParty": "C1", "TotalNetAmount": "100.00"},
            {"SalesOrder": "2", "SoldToParty": "C1", "TotalNetAmount": "50"},
            {"SalesOrder": "3", "SoldToParty": "C2", "TotalNetAmount": null}
        ]}});
        let page: Envelope<Collection<OrderRecord>> = serde_json::from_value(body).unwrap();

        let kpis = compute_kpis(&page.d.results, page.d.count, EmptyPagePolicy::ResetAll);
        assert_eq!(
            kpis,
            KpiSnapshot {
                total_orders: 3,
                total_revenue: 150,
                avg_order_value: 50,
                total_customers: 2,
            }
        );
        assert_eq!(page.d.results[2].total_net_amount, None);
    }

    #[test]
    fn test_server_count_sets_total_but_not_divisor() {
        let rows: Vec<OrderRecord> = (0..20)
            .map(|i| OrderRecord::new(i.to_string()).net_amount(10.0))
            .collect();
        let kpis = compute_kpis(&rows, Some(42), EmptyPagePolicy::ResetAll);
        assert_eq!(kpis.total_orders, 42);
        assert_eq!(kpis.total_revenue, 200);
        assert_eq!(kpis.avg_order_value, 10);
    }

    #[test]
    fn test_zero_server_count_falls_back_to_page_length() {
        let kpis = compute_kpis(&sample_page(), Some(0), EmptyPagePolicy::ResetAll);
        assert_eq!(kpis.total_orders, 3);
    }

    #[test]
    fn test_empty_page_reset_all() {
        let kpis = compute_kpis(&[], Some(42), EmptyPagePolicy::ResetAll);
        assert_eq!(kpis, KpiSnapshot::default());
    }

    #[test]
    fn test_empty_page_keep_server_total() {
        let kpis = compute_kpis(&[], Some(42), EmptyPagePolicy::KeepServerTotal);
        assert_eq!(kpis.total_orders, 42);
        assert_eq!(kpis.total_revenue, 0);
        assert_eq!(kpis.avg_order_value, 0);
        assert_eq!(kpis.total_customers, 0);

        let no_count = compute_kpis(&[], None, EmptyPagePolicy::KeepServerTotal);
        assert_eq!(no_count, KpiSnapshot::default());
    }

    #[test]
    fn test_distinct_customers_ignore_order_and_blanks() {
        let mut rows = sample_page();
        rows.push(OrderRecord::new("4").sold_to(""));
        rows.push(OrderRecord::new("5"));
        let forward = compute_kpis(&rows, None, EmptyPagePolicy::ResetAll);
        rows.reverse();
        let backward = compute_kpis(&rows, None, EmptyPagePolicy::ResetAll);

        assert_eq!(forward.total_customers, 2);
        assert_eq!(forward.total_customers, backward.total_customers);
    }

    #[test]
    fn test_rounding_is_half_up() {
        let rows = vec![
            OrderRecord::new("1").net_amount(0.5),
            OrderRecord::new("2").net_amount(1.0),
        ];
        let kpis = compute_kpis(&rows, None, EmptyPagePolicy::ResetAll);
        assert_eq!(kpis.total_revenue, 2); // 1.5
        assert_eq!(kpis.avg_order_value, 1); // 0.75

        let rows = vec![OrderRecord::new("1").net_amount(2.5)];
        let kpis = compute_kpis(&rows, None, EmptyPagePolicy::ResetAll);
        assert_eq!(kpis.total_revenue, 3);
    }

    #[test]
    fn test_average_uses_unrounded_revenue() {
        let rows = vec![
            OrderRecord::new("1").net_amount(0.4),
            OrderRecord::new("2").net_amount(0.4),
            OrderRecord::new("3").net_amount(0.4),
        ];
        let kpis = compute_kpis(&rows, None, EmptyPagePolicy::ResetAll);
        assert_eq!(kpis.total_revenue, 1); // 1.2
        assert_eq!(kpis.avg_order_value, 0); // 0.4, not 1/3
    }
}
