/// Represents a customer order as stored by the backend.
///
/// # Resource Framework
/// This struct implements the [`Resource`](crate::framework::Resource) trait,
/// allowing it to be served by a [`ResourceClient`](crate::framework::ResourceClient).
///
/// See [`impl Resource for Order`](#impl-Resource-for-Order) for details on:
/// - Creation payload (the full [`Order`])
/// - Update payload ([`OrderPatch`])
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

use crate::framework::{Resource, ResourceRoutes};

use super::lenient;

/// Lifecycle of an order. Unknown backend values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    /// A missing, `null` or non-string status reads as [`OrderStatus::Pending`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::opt_string(deserializer)?
            .map(OrderStatus::from)
            .unwrap_or_default())
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        OrderStatus::from(raw.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub customer: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<LineItem>,
    /// Creation timestamp as sent by the backend.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping_charges: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method: Option<String>,
    /// Fields the dashboard does not interpret (address, phone, cancel reason, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Creates a new Order instance.
    ///
    /// # Arguments
    /// * `id` - Backend identifier
    /// * `customer` - Display name of the customer
    /// * `amount` - Order total, excluding shipping
    ///
    /// # Notes
    /// The order starts as [`OrderStatus::Pending`].
    pub fn new(id: impl Into<String>, customer: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            amount,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<OrderStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Amount plus shipping charges.
    pub fn grand_total(&self) -> f64 {
        self.amount + self.shipping_charges.unwrap_or(0.0)
    }

    /// Case-insensitive match on id, customer name or e-mail.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.id.to_lowercase().contains(&term)
            || self.customer.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

/// Partial update for an order. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_charges: Option<f64>,
}

impl Resource for Order {
    type Draft = Order;
    type Patch = OrderPatch;

    const KIND: &'static str = "order";
    const ROUTES: ResourceRoutes = ResourceRoutes {
        list: "/api/orders",
        list_key: "orders",
        create: "/api/save-order",
        update: "/api/update-order",
        delete: "/api/delete-order",
        id_field: "orderId",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        if self.customer.is_empty() {
            "Customer"
        } else {
            &self.customer
        }
    }

    fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}

/// Narrows an order list the way the orders view does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub search: String,
    /// `None` means every status.
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    pub fn matches(&self, order: &Order) -> bool {
        let status_ok = self.status.as_ref().is_none_or(|s| *s == order.status);
        status_ok && order.matches_search(&self.search)
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_order_and_keeps_unknown_fields() {
        let order: Order = serde_json::from_value(json!({
            "id": "ORD-1",
            "customer": "Asha",
            "email": "asha@example.com",
            "amount": 1299,
            "status": "processing",
            "items": [{ "name": "Polish", "quantity": 2, "price": 649.5, "sku": "PL-1" }],
            "date": "2026-01-30T10:00:00Z",
            "paymentMethod": "upi",
            "address": "12 MG Road",
        }))
        .unwrap();

        assert_eq!(order.amount, 1299.0);
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items[0].extra["sku"], "PL-1");
        assert_eq!(order.payment_method.as_deref(), Some("upi"));
        assert_eq!(order.extra["address"], "12 MG Road");

        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["address"], "12 MG Road");
        assert_eq!(back["paymentMethod"], "upi");
    }

    #[test]
    fn null_fields_do_not_reject_the_order() {
        let order: Order = serde_json::from_value(json!({
            "id": "O2",
            "customer": null,
            "amount": null,
            "status": null,
            "items": null,
            "shippingCharges": "49",
        }))
        .unwrap();

        assert_eq!(order.amount, 0.0);
        assert!(order.items.is_empty());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.display_name(), "Customer");
        assert_eq!(order.grand_total(), 49.0);
    }

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let order: Order =
            serde_json::from_value(json!({ "id": "O1", "status": "returned" })).unwrap();
        assert_eq!(order.status, OrderStatus::Other("returned".into()));
        assert_eq!(serde_json::to_value(&order).unwrap()["status"], "returned");
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = OrderPatch {
            shipping_charges: Some(49.0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "shippingCharges": 49.0 })
        );
    }

    #[test]
    fn display_name_falls_back_for_anonymous_orders() {
        assert_eq!(Order::new("O1", "", 10.0).display_name(), "Customer");
        assert_eq!(Order::new("O1", "Ravi", 10.0).display_name(), "Ravi");
    }

    #[test]
    fn query_filters_by_search_and_status() {
        let orders = vec![
            Order::new("ORD-1", "Asha", 100.0).with_email("asha@example.com"),
            Order::new("ORD-2", "Ravi", 200.0).with_status("delivered"),
            Order::new("ORD-3", "Meera", 300.0).with_status("delivered"),
        ];

        let query = OrderQuery {
            search: "ra".into(),
            status: Some(OrderStatus::Delivered),
        };
        let found: Vec<_> = query.apply(&orders).iter().map(|o| o.id.as_str()).collect();
        assert_eq!(found, ["ORD-2", "ORD-3"]);

        let query = OrderQuery {
            search: "ASHA@".into(),
            status: None,
        };
        assert_eq!(query.apply(&orders).len(), 1);
    }
}
