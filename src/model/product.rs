/// Represents a catalog product.
///
/// # Resource Framework
/// This struct implements the [`Resource`](crate::framework::Resource) trait,
/// allowing it to be served by a [`ResourceClient`](crate::framework::ResourceClient).
///
/// See [`impl Resource for Product`](#impl-Resource-for-Product) for details on:
/// - Creation payload ([`ProductDraft`])
/// - Update payload ([`ProductPatch`])
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::framework::{Resource, ResourceRoutes};

use super::lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub featured: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub on_sale: bool,
    /// Specifications, variants, packs and anything else the backend stores.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Backend identifier
    /// * `name` - Product name
    /// * `price` - Product price
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            ..Default::default()
        }
    }
}

/// Payload for creating a product. The backend assigns the identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub featured: bool,
    pub on_sale: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update for a product. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<bool>,
}

impl Resource for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const KIND: &'static str = "product";
    const ROUTES: ResourceRoutes = ResourceRoutes {
        list: "/api/products",
        list_key: "products",
        create: "/api/products",
        update: "/api/products",
        delete: "/api/products",
        id_field: "id",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
