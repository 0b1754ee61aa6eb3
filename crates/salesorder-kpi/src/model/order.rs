use crate::model::odata::{lenient_amount, non_empty, odata_datetime};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for sales orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesOrderId(pub String);

impl SalesOrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SalesOrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SalesOrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for SalesOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type-safe identifier for customers (the order's `SoldToParty`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CustomerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sales order header as it appears in the list page.
///
/// Field names follow the `A_SalesOrder` entity set of the sales-order service. Every
/// field except the key is optional: the list page and the value-help queries select
/// different subsets, and the service omits or blanks fields freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "SalesOrder", default)]
    pub sales_order: SalesOrderId,
    #[serde(rename = "SoldToParty", default, deserialize_with = "non_empty")]
    pub sold_to_party: Option<CustomerId>,
    #[serde(rename = "TotalNetAmount", default, deserialize_with = "lenient_amount")]
    pub total_net_amount: Option<f64>,
    #[serde(rename = "TransactionCurrency", default)]
    pub transaction_currency: Option<String>,
    #[serde(rename = "CreatedByUser", default)]
    pub created_by_user: Option<String>,
    #[serde(rename = "SalesOrganization", default)]
    pub sales_organization: Option<String>,
    #[serde(rename = "SalesOrderType", default)]
    pub sales_order_type: Option<String>,
    #[serde(rename = "SalesOrderDate", default, deserialize_with = "odata_datetime")]
    pub sales_order_date: Option<NaiveDateTime>,
    #[serde(rename = "CreationDate", default, deserialize_with = "odata_datetime")]
    pub creation_date: Option<NaiveDateTime>,
}

impl OrderRecord {
    /// Creates an order header with only its key set.
    pub fn new(sales_order: impl Into<SalesOrderId>) -> Self {
        Self {
            sales_order: sales_order.into(),
            ..Default::default()
        }
    }

    pub fn sold_to(mut self, customer: impl Into<CustomerId>) -> Self {
        self.sold_to_party = Some(customer.into());
        self
    }

    pub fn net_amount(mut self, amount: f64) -> Self {
        self.total_net_amount = Some(amount);
        self
    }

    pub fn created_by(mut self, user: impl Into<String>) -> Self {
        self.created_by_user = Some(user.into());
        self
    }

    pub fn sales_org(mut self, org: impl Into<String>) -> Self {
        self.sales_organization = Some(org.into());
        self
    }

    pub fn order_type(mut self, order_type: impl Into<String>) -> Self {
        self.sales_order_type = Some(order_type.into());
        self
    }

    pub fn ordered_on(mut self, date: NaiveDateTime) -> Self {
        self.sales_order_date = Some(date);
        self
    }

    /// The customer to enrich this row with, if the order has a non-blank one.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.sold_to_party.as_ref().filter(|id| !id.0.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_wire_shapes() {
        let row: OrderRecord = serde_json::from_value(json!({
            "__metadata": {"type": "API_SALES_ORDER_SRV.A_SalesOrderType"},
            "SalesOrder": "1000001",
            "SoldToParty": "17100001",
            "TotalNetAmount": "1250.50",
            "TransactionCurrency": "EUR",
            "CreatedByUser": "CB9980000010",
            "SalesOrganization": "1710",
            "SalesOrderType": "OR",
            "SalesOrderDate": "/Date(1704412800000)/"
        }))
        .unwrap();

        assert_eq!(row.sales_order.as_str(), "1000001");
        assert_eq!(row.customer_id(), Some(&CustomerId::from("17100001")));
        assert_eq!(row.total_net_amount, Some(1250.5));
        assert!(row.sales_order_date.is_some());
        assert_eq!(row.creation_date, None);
    }

    #[test]
    fn test_blank_customer_and_bad_amount_are_absent() {
        let row: OrderRecord = serde_json::from_value(json!({
            "SalesOrder": "1000002",
            "SoldToParty": "",
            "TotalNetAmount": "not-a-number"
        }))
        .unwrap();

        assert_eq!(row.customer_id(), None);
        assert_eq!(row.total_net_amount, None);
    }

    #[test]
    fn test_builder_blank_customer_is_not_enriched() {
        let row = OrderRecord::new("1").sold_to("");
        assert!(row.sold_to_party.is_some());
        assert_eq!(row.customer_id(), None);
    }
}
