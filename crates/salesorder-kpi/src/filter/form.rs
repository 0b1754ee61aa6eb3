use crate::filter::{Filter, OrderField};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The filter bar of the order list. Empty text fields and unset dates are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilterForm {
    pub sales_order: String,
    pub customer: String,
    pub created_by: String,
    pub sales_org: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub order_type: String,
}

impl OrderFilterForm {
    /// The AND-ed filter set for the fields that are filled in.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        let contains = [
            (OrderField::SalesOrder, &self.sales_order),
            (OrderField::SoldToParty, &self.customer),
            (OrderField::CreatedByUser, &self.created_by),
            (OrderField::SalesOrganization, &self.sales_org),
        ];
        for (field, value) in contains {
            if !value.is_empty() {
                filters.push(Filter::contains(field, value.as_str()));
            }
        }

        if let Some(from) = self.date_from.and_then(start_of_day) {
            filters.push(Filter::on_or_after(OrderField::SalesOrderDate, from));
        }
        if let Some(to) = self.date_to.and_then(end_of_day) {
            filters.push(Filter::on_or_before(OrderField::SalesOrderDate, to));
        }
        if !self.order_type.is_empty() {
            filters.push(Filter::equals(
                OrderField::SalesOrderType,
                self.order_type.as_str(),
            ));
        }

        filters
    }
}

/// The free-text search: order id, customer or creator contains the query.
///
/// An empty query yields no filter at all.
pub fn search_filters(query: &str) -> Vec<Filter> {
    if query.is_empty() {
        return Vec::new();
    }
    vec![Filter::Any(vec![
        Filter::contains(OrderField::SalesOrder, query),
        Filter::contains(OrderField::SoldToParty, query),
        Filter::contains(OrderField::CreatedByUser, query),
    ])]
}

fn start_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_milli_opt(23, 59, 59, 999)
}
