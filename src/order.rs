//! Order document composition.
//!
//! The order form and its network submission live outside the core; the
//! core only guarantees that the current configuration is introspectable
//! into a complete, accurate summary.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::config::BoxConfig;

/// Customer-entered contact fields, collected by the external form.
#[derive(Debug, Clone, Default)]
pub struct OrderContact {
    pub external_order_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// The JSON document the external collaborator posts to the order
/// endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_id: String,
    pub external_order_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub product_details: String,
}

impl OrderDetails {
    pub fn from_config(config: &BoxConfig, contact: &OrderContact) -> Self {
        Self {
            order_id: generate_order_id(),
            external_order_id: contact
                .external_order_id
                .clone()
                .unwrap_or_else(|| String::from("none")),
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            product_details: config.product_details(),
        }
    }
}

/// `DH-` plus the last six digits of the current unix-millis timestamp.
fn generate_order_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("DH-{:06}", millis % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_has_prefix_and_six_digits() {
        let id = generate_order_id();
        assert!(id.starts_with("DH-"));
        assert_eq!(id.len(), 9);
        assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn order_document_carries_the_full_summary() {
        let config = BoxConfig::default();
        let contact = OrderContact {
            external_order_id: None,
            name: String::from("An"),
            phone: String::from("0123"),
            address: String::from("HCMC"),
        };
        let order = OrderDetails::from_config(&config, &contact);
        assert_eq!(order.external_order_id, "none");
        assert_eq!(order.product_details, config.product_details());

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&order).unwrap()).unwrap();
        for key in [
            "orderId",
            "externalOrderId",
            "name",
            "phone",
            "address",
            "productDetails",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
