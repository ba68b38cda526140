use serde_json::Value;

use super::{id_field, non_empty_array, opt_string_field, string_field, string_list};
use crate::entities::FoodItem;
use crate::enums::LegacyCategory;

/// A food document is canonical once it carries a non-empty `tags` list.
#[must_use]
pub fn is_canonical_food(doc: &Value) -> bool {
    non_empty_array(doc, "tags")
}

/// Normalize a food document, replacing the legacy `category` with tags.
///
/// `main` becomes `["Protein"]`, `side` becomes `["Veggie"]`. An unknown or
/// absent category yields no tags.
#[must_use]
pub fn normalize_food(doc: &Value) -> FoodItem {
    let tags = if is_canonical_food(doc) {
        string_list(doc.get("tags"))
    } else {
        doc.get("category")
            .and_then(Value::as_str)
            .and_then(LegacyCategory::parse)
            .map(|c| vec![c.tag().to_string()])
            .unwrap_or_default()
    };

    FoodItem {
        id: id_field(doc, "id").unwrap_or_default(),
        name: string_field(doc, "name"),
        image_url: opt_string_field(doc, "imageUrl"),
        tags,
    }
}
