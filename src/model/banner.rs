//! Promotional banners shown on the storefront.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::framework::{Resource, ResourceRoutes};

use super::lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: bool,
    /// Display position, lowest first.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub order: i64,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDraft {
    pub title: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub active: bool,
    pub order: i64,
}

/// Partial update for a banner. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Resource for Banner {
    type Draft = BannerDraft;
    type Patch = BannerPatch;

    const KIND: &'static str = "banner";
    const ROUTES: ResourceRoutes = ResourceRoutes {
        list: "/api/banners",
        list_key: "banners",
        create: "/api/banners",
        update: "/api/banners",
        delete: "/api/banners",
        id_field: "id",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}
