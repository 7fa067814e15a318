use serde::{Deserialize, Serialize};

/// Catalog entry for a popular pose style. Static data, never produced by
/// analysis; `id` is unique within the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendingPose {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub description: String,
}
