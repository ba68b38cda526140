use serde_json::Value;

use super::{id_field, opt_string_field, string_field};
use crate::entities::KidProfile;

/// Used when a profile document has no `avatarColor`.
const DEFAULT_AVATAR_COLOR: &str = "#94a3b8";

/// Normalize a kid profile. Older documents lack `avatarAnimal`.
#[must_use]
pub fn normalize_profile(doc: &Value) -> KidProfile {
    let avatar_color = string_field(doc, "avatarColor");
    KidProfile {
        id: id_field(doc, "id").unwrap_or_default(),
        name: string_field(doc, "name"),
        avatar_color: if avatar_color.is_empty() {
            DEFAULT_AVATAR_COLOR.to_string()
        } else {
            avatar_color
        },
        avatar_animal: opt_string_field(doc, "avatarAnimal"),
    }
}
