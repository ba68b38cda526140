use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Group ID to the food (or option) IDs picked from that group.
pub type SelectionMap = BTreeMap<String, Vec<String>>;

/// A kid's in-progress picks from the active menu.
///
/// Ephemeral: at most one live row per (household, kid), replaced on every
/// save.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KidSelection {
    pub kid_id: String,
    pub selections: SelectionMap,
}
