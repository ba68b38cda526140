use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SelectionPreset;

/// A named set of food groups kids choose from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub groups: Vec<MenuGroup>,
    /// Quick-access slot the menu is pinned to, if any.
    pub preset_slot: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuGroup {
    pub id: String,
    pub label: String,
    /// Ordered references to `FoodItem` IDs. Dangling IDs are preserved.
    pub food_ids: Vec<String>,
    pub selection_preset: SelectionPreset,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<Vec<String>>,
}
