use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A food a household can put on a menu.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    /// Ordered, possibly empty. Replaces the legacy single `category`.
    pub tags: Vec<String>,
}
