use crate::model::odata::{lenient_amount, nested_results, odata_datetime};
use crate::model::OrderRecord;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// A sales order with its items expanded, as shown on the detail page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: OrderRecord,
    #[serde(rename = "to_Item", default, deserialize_with = "nested_results")]
    pub items: Vec<OrderItem>,
}

impl OrderDetail {
    pub fn from_header(header: OrderRecord) -> Self {
        Self {
            header,
            items: Vec::new(),
        }
    }

    /// Sum of the item net amounts; items without an amount count as zero.
    pub fn items_net_total(&self) -> f64 {
        self.items.iter().filter_map(|i| i.net_amount).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "SalesOrderItem", default)]
    pub item: String,
    #[serde(rename = "Material", default)]
    pub material: Option<String>,
    #[serde(rename = "SalesOrderItemText", default)]
    pub text: Option<String>,
    #[serde(rename = "RequestedQuantity", default, deserialize_with = "lenient_amount")]
    pub requested_quantity: Option<f64>,
    #[serde(rename = "RequestedQuantityUnit", default)]
    pub quantity_unit: Option<String>,
    #[serde(rename = "NetAmount", default, deserialize_with = "lenient_amount")]
    pub net_amount: Option<f64>,
    #[serde(rename = "to_ScheduleLine", default, deserialize_with = "nested_results")]
    pub schedule_lines: Vec<ScheduleLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScheduleLine {
    #[serde(rename = "ScheduleLine", default)]
    pub line: String,
    #[serde(rename = "RequestedDeliveryDate", default, deserialize_with = "odata_datetime")]
    pub requested_delivery_date: Option<NaiveDateTime>,
    #[serde(rename = "ScheduleLineOrderQuantity", default, deserialize_with = "lenient_amount")]
    pub order_quantity: Option<f64>,
    #[serde(
        rename = "ConfdOrderQtyByMatlAvailCheck",
        default,
        deserialize_with = "lenient_amount"
    )]
    pub confirmed_quantity: Option<f64>,
}
