//! # Value Help
//!
//! Suggestion lists for the filter bar. The service is asked for up to
//! [`VALUE_HELP_ROW_LIMIT`] rows projected onto one field; the distinct non-blank values
//! are returned in ascending order.
use crate::filter::OrderField;
use crate::model::OrderRecord;
use std::collections::BTreeSet;

pub const VALUE_HELP_ROW_LIMIT: u32 = 1000;

/// A field that offers value help, with the title of its selection dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueHelp {
    pub field: OrderField,
    pub title: &'static str,
}

impl ValueHelp {
    pub const SALES_ORDER: ValueHelp = ValueHelp {
        field: OrderField::SalesOrder,
        title: "Select Sales Order",
    };
    pub const CUSTOMER: ValueHelp = ValueHelp {
        field: OrderField::SoldToParty,
        title: "Select Customer",
    };
    pub const CREATED_BY: ValueHelp = ValueHelp {
        field: OrderField::CreatedByUser,
        title: "Select User",
    };
    pub const SALES_ORG: ValueHelp = ValueHelp {
        field: OrderField::SalesOrganization,
        title: "Select Sales Organization",
    };

    pub const ALL: [ValueHelp; 4] = [
        Self::SALES_ORDER,
        Self::CUSTOMER,
        Self::CREATED_BY,
        Self::SALES_ORG,
    ];
}

/// Distinct non-blank values of `field`, sorted ascending by byte order.
pub fn distinct_values(rows: &[OrderRecord], field: OrderField) -> Vec<String> {
    rows.iter()
        .filter_map(|row| field.text_of(row))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_sorted_non_blank() {
        let rows = vec![
            OrderRecord::new("3").sold_to("C2"),
            OrderRecord::new("1").sold_to("C1"),
            OrderRecord::new("2").sold_to("C2"),
            OrderRecord::new("4").sold_to(""),
            OrderRecord::new("5"),
        ];
        assert_eq!(distinct_values(&rows, OrderField::SoldToParty), vec!["C1", "C2"]);
        assert_eq!(
            distinct_values(&rows, OrderField::SalesOrder),
            vec!["1", "2", "3", "4", "5"]
        );
    }
}
