use crate::model::CustomerId;
use serde::Deserialize;

/// The display name of a customer, as cached for the session.
///
/// When the business-partner lookup fails the cache holds a placeholder whose name is the
/// customer id itself, so a row always has something to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerName {
    pub id: CustomerId,
    pub name: String,
}

impl CustomerName {
    pub fn new(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn placeholder(id: &CustomerId) -> Self {
        Self::new(id.clone(), id.as_str())
    }
}

/// The subset of an `A_Customer` record used for display names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CustomerPayload {
    #[serde(rename = "CustomerName", default)]
    pub customer_name: Option<String>,
    #[serde(rename = "BPCustomerName", default)]
    pub bp_customer_name: Option<String>,
}

impl CustomerPayload {
    /// `CustomerName`, else `BPCustomerName`, else the id. Blank names count as missing.
    pub fn display_name(&self, id: &CustomerId) -> String {
        [&self.customer_name, &self.bp_customer_name]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback_chain() {
        let id = CustomerId::from("C1");
        let both = CustomerPayload {
            customer_name: Some("Acme".into()),
            bp_customer_name: Some("Acme BP".into()),
        };
        assert_eq!(both.display_name(&id), "Acme");

        let bp_only = CustomerPayload {
            customer_name: Some(String::new()),
            bp_customer_name: Some("Acme BP".into()),
        };
        assert_eq!(bp_only.display_name(&id), "Acme BP");

        assert_eq!(CustomerPayload::default().display_name(&id), "C1");
    }

    #[test]
    fn test_placeholder_uses_id() {
        let placeholder = CustomerName::placeholder(&CustomerId::from("C9"));
        assert_eq!(placeholder.name, "C9");
    }
}
