//! # Core Resource Framework
//!
//! This module defines the generic building blocks shared by every backend resource.
//!
//! ## Key Types
//!
//! - [`Resource`]: The trait that all resource records must implement.
//! - [`ResourceClient`]: The generic client that lists and mutates one resource kind.
//! - [`OperationResult`]: The uniform outcome of a write.
//! - [`Listing`]: A list result that remembers whether the refresh actually happened.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::transport::{RetryingTransport, TransportError};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// The REST routes of one resource kind.
///
/// Orders use dedicated verbs-in-path routes while products and banners share one path, so
/// every route is spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRoutes {
    /// `GET`, answering `{ <list_key>: [...] }`.
    pub list: &'static str,
    /// Key of the array in the list response.
    pub list_key: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    /// Name of the identifier field in update and delete bodies.
    pub id_field: &'static str,
}

/// Trait that any backend record must implement to be served by [`ResourceClient`].
///
/// # Architecture Note
/// The resource kinds differ only in their routes and payload shapes. Everything else (timeout,
/// retry, error normalization, list degradation) lives in [`ResourceClient`] and is written once.
///
/// The associated types keep the payloads apart: an `Order` update takes an `OrderPatch`, and a
/// `ProductPatch` will not compile in its place.
pub trait Resource: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Payload sent on create.
    type Draft: Serialize + Debug + Send + Sync;

    /// Partial update. Fields left as `None` must not be serialized.
    type Patch: Serialize + Debug + Send + Sync;

    /// Singular human name, used in log fields and fallback error messages.
    const KIND: &'static str;

    const ROUTES: ResourceRoutes;

    /// Stable backend identifier.
    fn id(&self) -> &str;

    /// Name shown in notifications about this record.
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Whether the record sits in the terminal "cancelled" state.
    fn is_cancelled(&self) -> bool {
        false
    }
}

// =============================================================================
// 2. RESULTS
// =============================================================================

/// Uniform outcome of a write.
///
/// Exactly one of data/error exists, so there is nothing to read by mistake.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success {
        data: T,
        timestamp: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            OperationResult::Success { data, .. } => Some(data),
            OperationResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure { error } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            OperationResult::Success { data, .. } => Ok(data),
            OperationResult::Failure { error } => Err(error),
        }
    }
}

/// A list result.
///
/// `stale` is set when the refresh failed; `items` is then empty and should not replace data the
/// caller already holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub stale: bool,
}

impl<T> Listing<T> {
    pub fn fresh(items: Vec<T>) -> Self {
        Self {
            items,
            stale: false,
        }
    }

    pub fn stale() -> Self {
        Self {
            items: Vec::new(),
            stale: true,
        }
    }
}

// =============================================================================
// 3. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for one resource kind.
///
/// Cheap to clone. All clients built from the same [`RetryingTransport`] share its timeout and
/// retry policy.
pub struct ResourceClient<T: Resource> {
    transport: Arc<RetryingTransport>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(transport: Arc<RetryingTransport>) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub fn transport(&self) -> &RetryingTransport {
        &self.transport
    }

    /// Lists every record in backend order. Never fails: an unreachable backend yields `[]`.
    pub async fn list(&self) -> Vec<T> {
        self.fetch().await.items
    }

    /// Like [`list`](Self::list), but tells a failed refresh apart from an empty collection.
    pub async fn fetch(&self) -> Listing<T> {
        let routes = T::ROUTES;
        match self.transport.send(Method::GET, routes.list, None).await {
            Ok(reply) => {
                let items = decode_list::<T>(&reply.body, routes.list_key);
                debug!(kind = T::KIND, count = items.len(), "Listed");
                Listing::fresh(items)
            }
            Err(e) => {
                warn!(kind = T::KIND, error = %e, "List failed, returning no records");
                Listing::stale()
            }
        }
    }

    pub async fn create(&self, draft: &T::Draft) -> OperationResult<Value> {
        let body = match serde_json::to_value(draft) {
            Ok(body) => body,
            Err(e) => return encode_failure::<T>("save", e),
        };
        let outcome = self
            .transport
            .send(Method::POST, T::ROUTES.create, Some(body))
            .await;
        normalize::<T>("save", outcome.map(|reply| reply.body))
    }

    /// Sends only the fields set in `patch`, plus the identifier.
    pub async fn update(&self, id: &str, patch: &T::Patch) -> OperationResult<Value> {
        let body = match patch_body(T::ROUTES.id_field, id, patch) {
            Ok(body) => body,
            Err(e) => return encode_failure::<T>("update", e),
        };
        let outcome = self
            .transport
            .send(Method::PUT, T::ROUTES.update, Some(body))
            .await;
        normalize::<T>("update", outcome.map(|reply| reply.body))
    }

    pub async fn delete(&self, id: &str) -> OperationResult<Value> {
        let mut body = Map::new();
        body.insert(T::ROUTES.id_field.to_string(), Value::String(id.to_string()));
        let outcome = self
            .transport
            .send(Method::DELETE, T::ROUTES.delete, Some(Value::Object(body)))
            .await;
        normalize::<T>("delete", outcome.map(|reply| reply.body))
    }
}

/// Reads `body[key]` as a list of records.
///
/// A missing key or a non-array value counts as an empty list. Records that do not decode are
/// skipped.
pub(crate) fn decode_list<T: Resource>(body: &Value, key: &str) -> Vec<T> {
    let Some(entries) = body.get(key).and_then(Value::as_array) else {
        if !body.is_null() {
            warn!(kind = T::KIND, key, "Response has no list under the expected key");
        }
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<T>(entry.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind = T::KIND, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

/// `collection/id` with the id percent-encoded as one path segment, so ids holding `/`, `?` or
/// `#` still address a single record.
pub(crate) fn item_path(collection: &str, id: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost").ok()?;
    url.set_path(collection);
    url.path_segments_mut().ok()?.pop_if_empty().push(id);
    Some(url.path().to_string())
}

fn patch_body<P: Serialize>(id_field: &str, id: &str, patch: &P) -> Result<Value, serde_json::Error> {
    let mut body = match serde_json::to_value(patch)? {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            let mut fields = Map::new();
            fields.insert("value".to_string(), other);
            fields
        }
    };
    body.insert(id_field.to_string(), Value::String(id.to_string()));
    Ok(Value::Object(body))
}

fn normalize<T: Resource>(
    verb: &str,
    outcome: Result<Value, TransportError>,
) -> OperationResult<Value> {
    match outcome {
        Ok(data) => {
            let timestamp = data
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string);
            OperationResult::Success { data, timestamp }
        }
        Err(e) => {
            warn!(kind = T::KIND, verb, error = %e, "Write failed");
            let error = e
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Failed to {verb} {}", T::KIND));
            OperationResult::Failure { error }
        }
    }
}

fn encode_failure<T: Resource>(verb: &str, e: serde_json::Error) -> OperationResult<Value> {
    warn!(kind = T::KIND, verb, error = %e, "Could not encode payload");
    OperationResult::Failure {
        error: format!("Failed to {verb} {}", T::KIND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockBackend;
    use crate::framework::transport::RetryPolicy;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_item_path_encodes_id_as_one_segment() {
        assert_eq!(
            item_path("/api/orders", "ORD-1").as_deref(),
            Some("/api/orders/ORD-1")
        );
        assert_eq!(
            item_path("/api/orders", "a/b?c#d").as_deref(),
            Some("/api/orders/a%2Fb%3Fc%23d")
        );
        assert_eq!(
            item_path("/api/orders", "").as_deref(),
            Some("/api/orders/")
        );
    }

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        name: String,
    }

    #[derive(Debug, Serialize)]
    struct WidgetDraft {
        name: String,
    }

    #[derive(Debug, Default, Serialize)]
    struct WidgetPatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        price: Option<f64>,
    }

    impl Resource for Widget {
        type Draft = WidgetDraft;
        type Patch = WidgetPatch;
        const KIND: &'static str = "widget";
        const ROUTES: ResourceRoutes = ResourceRoutes {
            list: "/api/widgets",
            list_key: "widgets",
            create: "/api/widgets",
            update: "/api/widgets",
            delete: "/api/widgets",
            id_field: "widgetId",
        };

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn client(mock: &MockBackend) -> ResourceClient<Widget> {
        let policy = RetryPolicy::new(2, Duration::from_millis(10));
        let transport = RetryingTransport::new(mock.backend(), policy, Duration::from_secs(30));
        ResourceClient::new(Arc::new(transport))
    }

    // --- Tests ---

    #[tokio::test]
    async fn list_preserves_backend_order() {
        let mut mock = MockBackend::new();
        mock.expect(Method::GET, "/api/widgets").return_json(
            200,
            json!({ "widgets": [
                { "id": "W2", "name": "second" },
                { "id": "W1", "name": "first" },
            ]}),
        );

        let widgets = client(&mock).list().await;
        let ids: Vec<_> = widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["W2", "W1"]);
    }

    #[tokio::test]
    async fn list_degrades_to_empty_when_retries_run_out() {
        let mut mock = MockBackend::new();
        mock.expect(Method::GET, "/api/widgets").return_status(500);
        mock.expect(Method::GET, "/api/widgets").return_timeout();

        let listing = client(&mock).fetch().await;
        assert!(listing.stale);
        assert!(listing.items.is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn list_treats_missing_key_as_empty() {
        let mut mock = MockBackend::new();
        mock.expect(Method::GET, "/api/widgets")
            .return_json(200, json!({ "message": "ok" }));

        let listing = client(&mock).fetch().await;
        assert_eq!(listing, Listing::fresh(Vec::new()));
    }

    #[tokio::test]
    async fn list_skips_malformed_records() {
        let mut mock = MockBackend::new();
        mock.expect(Method::GET, "/api/widgets").return_json(
            200,
            json!({ "widgets": [{ "id": "W1", "name": "ok" }, { "oops": true }] }),
        );

        assert_eq!(client(&mock).list().await.len(), 1);
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields_and_id() {
        let mut mock = MockBackend::new();
        mock.expect(Method::PUT, "/api/widgets").return_json(
            200,
            json!({ "success": true, "timestamp": "2026-01-30T10:00:00Z" }),
        );

        let patch = WidgetPatch {
            price: Some(12.5),
            ..Default::default()
        };
        let result = client(&mock).update("W1", &patch).await;

        assert!(result.is_success());
        assert!(matches!(
            &result,
            OperationResult::Success { timestamp: Some(ts), .. } if ts == "2026-01-30T10:00:00Z"
        ));
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({ "widgetId": "W1", "price": 12.5 }))
        );
    }

    #[tokio::test]
    async fn write_failure_surfaces_backend_message() {
        let mut mock = MockBackend::new();
        mock.expect(Method::POST, "/api/widgets")
            .return_json(400, json!({ "error": "Name is required" }));

        let draft = WidgetDraft { name: String::new() };
        let result = client(&mock).create(&draft).await;

        assert_eq!(result.error(), Some("Name is required"));
        assert!(result.data().is_none());
    }

    #[tokio::test]
    async fn write_failure_falls_back_to_generic_message() {
        let mut mock = MockBackend::new();
        mock.expect(Method::DELETE, "/api/widgets").return_status(503);
        mock.expect(Method::DELETE, "/api/widgets").return_status(503);

        let result = client(&mock).delete("W9").await;

        assert_eq!(result.error(), Some("Failed to delete widget"));
        assert_eq!(mock.requests()[0].body, Some(json!({ "widgetId": "W9" })));
        mock.verify();
    }
}
