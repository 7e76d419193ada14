use crate::clients::resource_api::ResourceApi;
use crate::framework::{OperationResult, ResourceClient};
use crate::model::{Banner, BannerDraft, BannerPatch};
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for the backend's banner routes.
#[derive(Clone)]
pub struct BannerClient {
    inner: ResourceClient<Banner>,
}

impl BannerClient {
    pub fn new(inner: ResourceClient<Banner>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn save_banner(&self, draft: &BannerDraft) -> OperationResult<Value> {
        debug!(?draft, "save_banner called");
        self.inner.create(draft).await
    }

    #[instrument(skip(self))]
    pub async fn update_banner(&self, id: &str, patch: &BannerPatch) -> OperationResult<Value> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    /// Show or hide a banner.
    pub async fn set_active(&self, id: &str, active: bool) -> OperationResult<Value> {
        let patch = BannerPatch {
            active: Some(active),
            ..Default::default()
        };
        self.update_banner(id, &patch).await
    }

    /// Move a banner to display position `order`.
    pub async fn set_position(&self, id: &str, order: i64) -> OperationResult<Value> {
        let patch = BannerPatch {
            order: Some(order),
            ..Default::default()
        };
        self.update_banner(id, &patch).await
    }
}

impl ResourceApi<Banner> for BannerClient {
    fn inner(&self) -> &ResourceClient<Banner> {
        &self.inner
    }
}
