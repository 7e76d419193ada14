use crate::clients::resource_api::ResourceApi;
use crate::framework::core::item_path;
use crate::framework::{OperationResult, Resource, ResourceClient};
use crate::model::{Order, OrderPatch, OrderStatus};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Client for the backend's order routes.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Fetch a single order. `None` when it does not exist or the backend cannot be reached.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> Option<Order> {
        let Some(path) = item_path(Order::ROUTES.list, id) else {
            warn!("Order id does not form a valid path");
            return None;
        };
        let reply = match self.inner.transport().send(Method::GET, &path, None).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Failed to fetch order");
                return None;
            }
        };
        let order = reply.body.get("order").filter(|v| !v.is_null())?;
        serde_json::from_value(order.clone())
            .map_err(|e| warn!(error = %e, "Malformed order"))
            .ok()
    }

    #[instrument(skip(self, order), fields(id = %order.id))]
    pub async fn save_order(&self, order: &Order) -> OperationResult<Value> {
        debug!(?order, "save_order called");
        self.inner.create(order).await
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: &str, patch: &OrderPatch) -> OperationResult<Value> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    /// Move an order to `status`, leaving every other field alone.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> OperationResult<Value> {
        let patch = OrderPatch {
            status: Some(status),
            ..Default::default()
        };
        self.update_order(id, &patch).await
    }

    /// Set the shipping charges of an order, leaving every other field alone.
    pub async fn update_shipping_charges(&self, id: &str, charges: f64) -> OperationResult<Value> {
        let patch = OrderPatch {
            shipping_charges: Some(charges),
            ..Default::default()
        };
        self.update_order(id, &patch).await
    }
}

impl ResourceApi<Order> for OrderClient {
    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }
}
