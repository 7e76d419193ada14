use crate::framework::{Listing, OperationResult, Resource, ResourceClient};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for resource-specific clients to inherit the shared operations.
///
/// This trait reduces boilerplate by providing default implementations for
/// the operations every resource has in the same shape: `list`, `fetch` and `delete`.
#[async_trait]
pub trait ResourceApi<T: Resource>: Send + Sync {
    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Every record in backend order; empty when the backend cannot be reached.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn list(&self) -> Vec<T> {
        tracing::debug!("Sending request");
        self.inner().list().await
    }

    /// Every record, flagged stale when the refresh failed.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn fetch(&self) -> Listing<T> {
        tracing::debug!("Sending request");
        self.inner().fetch().await
    }

    /// Delete a record by ID.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn delete(&self, id: &str) -> OperationResult<Value> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await
    }
}
