//! # Product Client
//!
//! Provides a high-level API for the catalog routes.
//! It wraps a `ResourceClient<Product>` and exposes domain-specific methods.
use crate::clients::resource_api::ResourceApi;
use crate::framework::{OperationResult, ResourceClient};
use crate::model::{Product, ProductDraft, ProductPatch};
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for the backend's product routes.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn save_product(&self, draft: &ProductDraft) -> OperationResult<Value> {
        debug!(?draft, "save_product called");
        self.inner.create(draft).await
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> OperationResult<Value> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }
}

impl ResourceApi<Product> for ProductClient {
    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }
}
