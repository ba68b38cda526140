use serde_json::Value;

use super::{id_field, id_list, non_empty_object, present};
use crate::entities::{KidSelection, SelectionMap};
use crate::ids::{MAIN_GROUP_ID, SIDE_GROUP_ID};

/// A selection document is canonical once `selections` is a non-empty map.
#[must_use]
pub fn is_canonical_kid_selection(doc: &Value) -> bool {
    non_empty_object(doc, "selections")
}

/// Read the group-keyed selection map from either shape.
///
/// Legacy documents carry `mainId` (nullable) and `sideIds`; they map onto
/// the two synthetic group keys that legacy menus are normalized into.
#[must_use]
pub fn normalize_selection_map(doc: &Value) -> SelectionMap {
    if is_canonical_kid_selection(doc) {
        return doc
            .get("selections")
            .and_then(Value::as_object)
            .map(|obj| {
                obj.iter()
                    .map(|(group, ids)| (group.clone(), id_list(Some(ids))))
                    .collect()
            })
            .unwrap_or_default();
    }

    let mut map = SelectionMap::new();
    if doc.get("mainId").is_some() || present(doc, "sideIds") {
        map.insert(MAIN_GROUP_ID.to_string(), id_list(doc.get("mainId")));
        map.insert(SIDE_GROUP_ID.to_string(), id_list(doc.get("sideIds")));
    }
    map
}

#[must_use]
pub fn normalize_kid_selection(doc: &Value) -> KidSelection {
    KidSelection {
        kid_id: id_field(doc, "kidId").unwrap_or_default(),
        selections: normalize_selection_map(doc),
    }
}
