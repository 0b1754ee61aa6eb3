//! # Filter & Search Composition
//!
//! A [`Filter`] is a predicate over [`OrderRecord`] fields. The active set of filters is
//! AND-ed; a [`Filter::Any`] group is OR-ed inside. The same predicate tree renders to an
//! OData v2 `$filter` expression for the remote service and evaluates in memory for the
//! in-memory source, so both order sources agree on what a filter means.
//!
//! - [`form`] - the filter bar and the free-text search, turned into filter sets
//! - [`query`] - paging, projection and the query-string pairs sent to the service

pub mod form;
pub mod query;

pub use form::*;
pub use query::*;

use crate::model::OrderRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const ODATA_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Order header fields that can be filtered, searched or offered as value help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
    SalesOrder,
    SoldToParty,
    CreatedByUser,
    SalesOrganization,
    SalesOrderType,
    SalesOrderDate,
}

impl OrderField {
    /// The property name on the `A_SalesOrder` entity.
    pub fn name(self) -> &'static str {
        match self {
            OrderField::SalesOrder => "SalesOrder",
            OrderField::SoldToParty => "SoldToParty",
            OrderField::CreatedByUser => "CreatedByUser",
            OrderField::SalesOrganization => "SalesOrganization",
            OrderField::SalesOrderType => "SalesOrderType",
            OrderField::SalesOrderDate => "SalesOrderDate",
        }
    }

    /// The field's text value on a row. Blank values are absent.
    pub fn text_of(self, row: &OrderRecord) -> Option<&str> {
        let value = match self {
            OrderField::SalesOrder => Some(row.sales_order.as_str()),
            OrderField::SoldToParty => row.sold_to_party.as_ref().map(|id| id.as_str()),
            OrderField::CreatedByUser => row.created_by_user.as_deref(),
            OrderField::SalesOrganization => row.sales_organization.as_deref(),
            OrderField::SalesOrderType => row.sales_order_type.as_deref(),
            OrderField::SalesOrderDate => None,
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn date_of(self, row: &OrderRecord) -> Option<NaiveDateTime> {
        match self {
            OrderField::SalesOrderDate => row.sales_order_date,
            _ => None,
        }
    }
}

impl Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Contains,
    Equals,
    GreaterOrEqual,
    LessOrEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Condition {
        field: OrderField,
        operator: FilterOperator,
        value: FilterValue,
    },
    /// Disjunction of the nested filters.
    Any(Vec<Filter>),
}

impl Filter {
    pub fn contains(field: OrderField, value: impl Into<String>) -> Self {
        Filter::Condition {
            field,
            operator: FilterOperator::Contains,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn equals(field: OrderField, value: impl Into<String>) -> Self {
        Filter::Condition {
            field,
            operator: FilterOperator::Equals,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn on_or_after(field: OrderField, at: NaiveDateTime) -> Self {
        Filter::Condition {
            field,
            operator: FilterOperator::GreaterOrEqual,
            value: FilterValue::DateTime(at),
        }
    }

    pub fn on_or_before(field: OrderField, at: NaiveDateTime) -> Self {
        Filter::Condition {
            field,
            operator: FilterOperator::LessOrEqual,
            value: FilterValue::DateTime(at),
        }
    }

    /// Evaluates the predicate against a row. A row lacking the field never matches.
    ///
    /// `Contains` is case-sensitive.
    pub fn matches(&self, row: &OrderRecord) -> bool {
        match self {
            Filter::Any(filters) => filters.iter().any(|f| f.matches(row)),
            Filter::Condition {
                field,
                operator,
                value: FilterValue::Text(expected),
            } => match field.text_of(row) {
                Some(actual) => match operator {
                    FilterOperator::Contains => actual.contains(expected.as_str()),
                    FilterOperator::Equals => actual == expected.as_str(),
                    FilterOperator::GreaterOrEqual => actual >= expected.as_str(),
                    FilterOperator::LessOrEqual => actual <= expected.as_str(),
                },
                None => false,
            },
            Filter::Condition {
                field,
                operator,
                value: FilterValue::DateTime(expected),
            } => match field.date_of(row) {
                Some(actual) => match operator {
                    FilterOperator::GreaterOrEqual => actual >= *expected,
                    FilterOperator::LessOrEqual => actual <= *expected,
                    FilterOperator::Equals => actual == *expected,
                    FilterOperator::Contains => false,
                },
                None => false,
            },
        }
    }

    /// Renders the predicate as an OData v2 `$filter` expression.
    pub fn to_odata(&self) -> String {
        match self {
            Filter::Any(filters) if filters.is_empty() => "false".to_string(),
            Filter::Any(filters) => {
                let parts: Vec<String> = filters.iter().map(Filter::to_odata).collect();
                format!("({})", parts.join(" or "))
            }
            Filter::Condition {
                field,
                operator,
                value,
            } => {
                let literal = match value {
                    FilterValue::Text(text) => format!("'{}'", text.replace('\'', "''")),
                    FilterValue::DateTime(at) => {
                        format!("datetime'{}'", at.format(ODATA_DATETIME_FORMAT))
                    }
                };
                match operator {
                    FilterOperator::Contains => format!("substringof({literal},{field})"),
                    FilterOperator::Equals => format!("{field} eq {literal}"),
                    FilterOperator::GreaterOrEqual => format!("{field} ge {literal}"),
                    FilterOperator::LessOrEqual => format!("{field} le {literal}"),
                }
            }
        }
    }
}

/// True when the row satisfies every filter of the set.
pub fn matches_all(filters: &[Filter], row: &OrderRecord) -> bool {
    filters.iter().all(|f| f.matches(row))
}

/// Renders a filter set as one `$filter` expression, or `None` for an empty set.
pub fn to_odata_filter(filters: &[Filter]) -> Option<String> {
    if filters.is_empty() {
        return None;
    }
    let parts: Vec<String> = filters.iter().map(Filter::to_odata).collect();
    Some(parts.join(" and "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_renders_operators() {
        assert_eq!(
            Filter::contains(OrderField::SoldToParty, "171").to_odata(),
            "substringof('171',SoldToParty)"
        );
        assert_eq!(
            Filter::equals(OrderField::SalesOrderType, "OR").to_odata(),
            "SalesOrderType eq 'OR'"
        );
        assert_eq!(
            Filter::on_or_after(OrderField::SalesOrderDate, at(2024, 1, 5)).to_odata(),
            "SalesOrderDate ge datetime'2024-01-05T00:00:00.000'"
        );
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(
            Filter::contains(OrderField::CreatedByUser, "O'Brien").to_odata(),
            "substringof('O''Brien',CreatedByUser)"
        );
    }

    #[test]
    fn test_set_is_and_of_parenthesised_groups() {
        let filters = vec![
            Filter::Any(vec![
                Filter::contains(OrderField::SalesOrder, "1"),
                Filter::contains(OrderField::SoldToParty, "1"),
            ]),
            Filter::equals(OrderField::SalesOrderType, "OR"),
        ];
        assert_eq!(
            to_odata_filter(&filters).unwrap(),
            "(substringof('1',SalesOrder) or substringof('1',SoldToParty)) and SalesOrderType eq 'OR'"
        );
        assert_eq!(to_odata_filter(&[]), None);
    }

    #[test]
    fn test_in_memory_evaluation() {
        let row = OrderRecord::new("1000042")
            .sold_to("17100001")
            .order_type("OR")
            .ordered_on(at(2024, 1, 5));

        assert!(Filter::contains(OrderField::SalesOrder, "0042").matches(&row));
        assert!(!Filter::equals(OrderField::SalesOrderType, "O").matches(&row));
        assert!(Filter::on_or_before(OrderField::SalesOrderDate, at(2024, 1, 5)).matches(&row));
        assert!(!Filter::on_or_after(OrderField::SalesOrderDate, at(2024, 1, 6)).matches(&row));
        // absent field never matches
        assert!(!Filter::contains(OrderField::CreatedByUser, "").matches(&row));
        assert!(!Filter::Any(vec![]).matches(&row));
    }
}
