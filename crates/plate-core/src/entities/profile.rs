use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KidProfile {
    pub id: String,
    pub name: String,
    pub avatar_color: String,
    pub avatar_animal: Option<String>,
}
