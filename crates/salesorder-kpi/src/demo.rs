//! Built-in demo data, used when no service URLs are configured.
use crate::clients::{InMemoryDirectory, InMemoryOrderSource};
use crate::model::{CustomerPayload, OrderDetail, OrderItem, OrderRecord};
use chrono::{NaiveDate, NaiveDateTime};

fn day(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub fn demo_orders() -> Vec<OrderRecord> {
    let rows = [
        ("1000001", "17100001", 1250.50, "CB9980000010", "1710", "OR", day(1, 5)),
        ("1000002", "17100002", 830.00, "CB9980000010", "1710", "OR", day(1, 12)),
        ("1000003", "17100001", 99.99, "CB9980000022", "1710", "CR", day(2, 3)),
        ("1000004", "17100003", 4410.00, "CB9980000022", "1720", "OR", day(2, 19)),
        ("1000005", "17100009", 15.25, "CB9980000031", "1720", "RE", day(3, 1)),
    ];
    let mut orders: Vec<OrderRecord> = rows
        .into_iter()
        .map(|(id, customer, amount, user, org, order_type, date)| {
            OrderRecord::new(id)
                .sold_to(customer)
                .net_amount(amount)
                .created_by(user)
                .sales_org(org)
                .order_type(order_type)
                .ordered_on(date)
        })
        .collect();
    orders.push(OrderRecord::new("1000006").created_by("CB9980000031").sales_org("1720"));
    orders
}

pub fn demo_order_source() -> InMemoryOrderSource {
    let header = demo_orders().into_iter().next().unwrap_or_default();
    let detail = OrderDetail {
        header,
        items: vec![
            OrderItem {
                item: "10".into(),
                material: Some("TG11".into()),
                text: Some("Trading Good 11".into()),
                requested_quantity: Some(5.0),
                quantity_unit: Some("PC".into()),
                net_amount: Some(1000.00),
                schedule_lines: Vec::new(),
            },
            OrderItem {
                item: "20".into(),
                material: Some("TG12".into()),
                text: Some("Trading Good 12".into()),
                requested_quantity: Some(1.0),
                quantity_unit: Some("PC".into()),
                net_amount: Some(250.50),
                schedule_lines: Vec::new(),
            },
        ],
    };
    InMemoryOrderSource::new(demo_orders()).with_detail(detail)
}

/// Customer 17100009 is unknown to the directory and shows as its id.
pub fn demo_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_customer("17100001", "Domestic US Customer 1")
        .with_payload(
            "17100002",
            CustomerPayload {
                customer_name: None,
                bp_customer_name: Some("Inlandskunde DE 2".into()),
            },
        )
        .with_customer("17100003", "Domestic US Customer 3")
}
