use chrono::DateTime;
use serde_json::Value;

use super::{
    bool_field, id_field, non_empty_object, normalize_selection_map, present, string_field,
    timestamp_field,
};
use crate::entities::{CompletionMap, MealRecord, MealReview, MealSelection};

/// A review document is canonical once `completions` is a non-empty map.
#[must_use]
pub fn is_canonical_review(doc: &Value) -> bool {
    non_empty_object(doc, "completions")
}

/// True for a legacy review whose `mainCompletion` will be dropped.
///
/// That field never recorded which food it referred to, so normalization
/// discards it instead of guessing.
#[must_use]
pub fn has_unrecoverable_main_completion(doc: &Value) -> bool {
    !is_canonical_review(doc) && present(doc, "mainCompletion")
}

/// Normalize a meal review.
///
/// Legacy reviews carry `mainCompletion` plus a food-keyed
/// `sideCompletions` map. Only `sideCompletions` is carried forward.
#[must_use]
pub fn normalize_review(doc: &Value) -> MealReview {
    let source = if is_canonical_review(doc) {
        doc.get("completions")
    } else {
        doc.get("sideCompletions")
    };

    MealReview {
        kid_id: id_field(doc, "kidId"),
        kid_name: string_field(doc, "kidName"),
        completions: completion_map(source),
        earned_star: bool_field(doc, "earnedStar").unwrap_or(false),
    }
}

fn completion_map(v: Option<&Value>) -> CompletionMap {
    v.and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(food_id, level)| {
                    let level = level.as_str().and_then(|s| s.parse().ok());
                    (food_id.clone(), level)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[must_use]
pub fn normalize_meal_selection(doc: &Value) -> MealSelection {
    MealSelection {
        kid_id: id_field(doc, "kidId"),
        kid_name: string_field(doc, "kidName"),
        selections: normalize_selection_map(doc),
    }
}

/// Normalize a meal record with all nested selections and reviews.
///
/// A missing `date` is derived from `completedAt` (UTC).
#[must_use]
pub fn normalize_meal(doc: &Value) -> MealRecord {
    let completed_at = timestamp_field(doc, "completedAt").unwrap_or(0);
    let date = match string_field(doc, "date") {
        d if !d.is_empty() => d,
        _ if completed_at > 0 => DateTime::from_timestamp_millis(completed_at)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    MealRecord {
        id: id_field(doc, "id").unwrap_or_default(),
        menu_id: id_field(doc, "menuId"),
        date,
        completed_at,
        selections: nested(doc, "selections", normalize_meal_selection),
        reviews: nested(doc, "reviews", normalize_review),
    }
}

fn nested<T>(doc: &Value, field: &str, f: fn(&Value) -> T) -> Vec<T> {
    doc.get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(f).collect())
        .unwrap_or_default()
}
