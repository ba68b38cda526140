use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::SelectionMap;
use crate::enums::SelectionPreset;

/// A menu published under a public token for people outside the household.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedMenu {
    pub id: String,
    /// Public, unique, unguessable.
    pub token: String,
    pub title: String,
    pub description: Option<String>,
    pub groups: Vec<SharedMenuGroup>,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedMenuGroup {
    pub id: String,
    pub label: String,
    pub options: Vec<SharedMenuOption>,
    pub selection_preset: SelectionPreset,
    pub order: i64,
}

/// Free-text choice; shared menus do not reference `FoodItem` rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedMenuOption {
    pub id: String,
    pub text: String,
    pub image_url: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedMenuResponse {
    pub id: String,
    pub menu_id: String,
    pub respondent_name: String,
    /// Shared group ID to chosen option IDs.
    pub selections: SelectionMap,
    pub timestamp: i64,
}
