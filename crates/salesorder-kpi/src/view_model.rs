//! The row view-model of the order list, published through a `watch` channel.
//!
//! A new page replaces the whole state. Name resolution then patches rows in place,
//! keyed by customer id; a patch from an older epoch leaves the state untouched.
use crate::model::{Epoch, KpiSnapshot, OrderPage, OrderRecord};
use crate::resolver::RowPatch;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub order: OrderRecord,
    /// Resolved display name of the row's customer, once known.
    pub customer_name: Option<String>,
}

impl OrderRow {
    pub fn new(order: OrderRecord) -> Self {
        Self {
            order,
            customer_name: None,
        }
    }

    /// `"17100001 - Domestic US Customer 1"`, or the bare id while the name is unknown or
    /// is only the id placeholder. Empty for orders without a customer.
    pub fn customer_label(&self) -> String {
        let Some(id) = self.order.customer_id() else {
            return String::new();
        };
        match self.customer_name.as_deref() {
            Some(name) if !name.is_empty() && name != id.as_str() => format!("{id} - {name}"),
            _ => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderListState {
    pub epoch: Epoch,
    pub rows: Vec<OrderRow>,
    pub kpis: KpiSnapshot,
    pub total_count: Option<u64>,
}

impl OrderListState {
    pub fn from_page(epoch: Epoch, page: OrderPage, kpis: KpiSnapshot) -> Self {
        Self {
            epoch,
            rows: page.rows.into_iter().map(OrderRow::new).collect(),
            kpis,
            total_count: page.total_count,
        }
    }

    /// Applies a name to every row of the patch's customer. Returns the number of rows
    /// that changed; a stale patch changes nothing.
    pub fn apply_patch(&mut self, patch: &RowPatch) -> usize {
        if patch.epoch != self.epoch {
            return 0;
        }
        let mut changed = 0;
        for row in &mut self.rows {
            if row.order.customer_id() == Some(&patch.customer_id)
                && row.customer_name.as_deref() != Some(patch.display_name.as_str())
            {
                row.customer_name = Some(patch.display_name.clone());
                changed += 1;
            }
        }
        changed
    }

    /// True once every row with a customer carries a name.
    pub fn is_enriched(&self) -> bool {
        self.rows
            .iter()
            .filter(|row| row.order.customer_id().is_some())
            .all(|row| row.customer_name.is_some())
    }
}
