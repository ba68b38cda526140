use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::SelectionMap;
use crate::enums::Completion;

/// Food ID to how much of it was eaten. `None` means not yet reviewed.
pub type CompletionMap = BTreeMap<String, Option<Completion>>;

/// A served meal with what each kid picked and how each kid ate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id: String,
    /// May reference a menu deleted since the meal was served.
    pub menu_id: Option<String>,
    /// Calendar date the meal was served, `YYYY-MM-DD`.
    pub date: String,
    pub completed_at: i64,
    pub selections: Vec<MealSelection>,
    pub reviews: Vec<MealReview>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealSelection {
    pub kid_id: Option<String>,
    /// Name at the time the meal was served. Never back-filled from a rename.
    pub kid_name: String,
    pub selections: SelectionMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealReview {
    pub kid_id: Option<String>,
    /// Name at the time the meal was served. Never back-filled from a rename.
    pub kid_name: String,
    pub completions: CompletionMap,
    pub earned_star: bool,
}
