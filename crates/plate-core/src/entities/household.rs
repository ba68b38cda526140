use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The owner of every other row. Migration creates exactly one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: String,
    pub name: String,
    /// Menu currently offered to the kids, if any.
    pub active_menu_id: Option<String>,
}
