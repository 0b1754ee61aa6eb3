use crate::filter::{to_odata_filter, Filter, OrderField};

/// A read against the order entity set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub filters: Vec<Filter>,
    /// Projection; empty selects every field.
    pub select: Vec<OrderField>,
    pub top: Option<u32>,
    /// Ask the service for the server-side total (`$inlinecount=allpages`).
    pub inline_count: bool,
}

impl OrderQuery {
    /// The list page: filtered rows plus the server-side total.
    pub fn page(filters: Vec<Filter>, top: u32) -> Self {
        Self {
            filters,
            top: Some(top),
            inline_count: true,
            ..Default::default()
        }
    }

    /// Candidate values for one field's value help.
    pub fn value_help(field: OrderField, filters: Vec<Filter>, top: u32) -> Self {
        Self {
            filters,
            select: vec![field],
            top: Some(top),
            ..Default::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = to_odata_filter(&self.filters) {
            pairs.push(("$filter".to_string(), filter));
        }
        if !self.select.is_empty() {
            let fields: Vec<&str> = self.select.iter().map(|f| f.name()).collect();
            pairs.push(("$select".to_string(), fields.join(",")));
        }
        if let Some(top) = self.top {
            pairs.push(("$top".to_string(), top.to_string()));
        }
        if self.inline_count {
            pairs.push(("$inlinecount".to_string(), "allpages".to_string()));
        }
        pairs
    }
}
