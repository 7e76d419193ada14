//! Aggregates shown on the dashboard, computed from the order list.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Order, OrderStatus};

/// How many orders the dashboard lists under "recent".
pub const RECENT_ORDERS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of order amounts, shipping excluded.
    pub total_revenue: f64,
    pub total_orders: usize,
    pub pending_orders: usize,
    /// Orders in the `delivered` state.
    pub completed_orders: usize,
    /// Distinct customer e-mail addresses.
    pub unique_customers: usize,
}

impl DashboardStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
        let customers: HashSet<&str> = orders.iter().map(|o| o.email.as_str()).collect();

        Self {
            total_revenue: orders.iter().map(|o| o.amount).sum(),
            total_orders: orders.len(),
            pending_orders: count(OrderStatus::Pending),
            completed_orders: count(OrderStatus::Delivered),
            unique_customers: customers.len(),
        }
    }
}

/// The first `limit` orders, in backend order.
pub fn recent(orders: &[Order], limit: usize) -> &[Order] {
    &orders[..orders.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_orders() {
        let orders = vec![
            Order::new("O1", "Asha", 500.0).with_email("asha@example.com"),
            Order::new("O2", "Ravi", 750.0)
                .with_email("ravi@example.com")
                .with_status("delivered"),
            Order::new("O3", "Asha", 250.0)
                .with_email("asha@example.com")
                .with_status("cancelled"),
        ];

        let stats = DashboardStats::from_orders(&orders);
        assert_eq!(stats.total_revenue, 1500.0);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.unique_customers, 2);
    }

    #[test]
    fn empty_list_gives_zeroes() {
        assert_eq!(DashboardStats::from_orders(&[]), DashboardStats::default());
    }

    #[test]
    fn recent_keeps_backend_order() {
        let orders: Vec<_> = (0..12)
            .map(|i| Order::new(format!("O{i}"), "Asha", 10.0))
            .collect();

        let shown = recent(&orders, RECENT_ORDERS);
        assert_eq!(shown.len(), 10);
        assert_eq!(shown[0].id, "O0");
        assert_eq!(recent(&orders[..3], RECENT_ORDERS).len(), 3);
    }
}
