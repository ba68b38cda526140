use serde_json::Value;

use super::{
    id_field, id_list, int_field, non_empty_array, present, string_field, string_list,
    timestamp_field,
};
use crate::entities::{Menu, MenuGroup};
use crate::enums::SelectionPreset;
use crate::ids::{MAIN_GROUP_ID, SIDE_GROUP_ID};

/// A menu document is canonical once it carries a non-empty `groups` list.
#[must_use]
pub fn is_canonical_menu(doc: &Value) -> bool {
    non_empty_array(doc, "groups")
}

/// Normalize a menu document.
///
/// Legacy menus carry flat `mains` and `sides` lists. When either is present
/// and there are no groups, two groups are synthesized in fixed order:
/// `main-group` (`pick-1`) then `side-group` (`pick-1-2`). A menu with
/// neither shape has no groups.
#[must_use]
pub fn normalize_menu(doc: &Value) -> Menu {
    let groups = if is_canonical_menu(doc) {
        doc.get("groups")
            .and_then(Value::as_array)
            .map(|groups| {
                groups
                    .iter()
                    .enumerate()
                    .map(|(idx, g)| normalize_group(g, idx))
                    .collect()
            })
            .unwrap_or_default()
    } else if present(doc, "mains") || present(doc, "sides") {
        legacy_groups(doc)
    } else {
        Vec::new()
    };

    let created_at = timestamp_field(doc, "createdAt").unwrap_or(0);
    Menu {
        id: id_field(doc, "id").unwrap_or_default(),
        name: string_field(doc, "name"),
        groups,
        preset_slot: int_field(doc, "presetSlot"),
        created_at,
        updated_at: timestamp_field(doc, "updatedAt").unwrap_or(created_at),
    }
}

fn normalize_group(g: &Value, idx: usize) -> MenuGroup {
    let position = i64::try_from(idx).unwrap_or(i64::MAX);
    MenuGroup {
        id: id_field(g, "id").unwrap_or_else(|| format!("group-{idx}")),
        label: string_field(g, "label"),
        food_ids: id_list(g.get("foodIds")),
        selection_preset: g
            .get("selectionPreset")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        order: int_field(g, "order").unwrap_or(position),
        filter_tags: g
            .get("filterTags")
            .filter(|v| v.is_array())
            .map(|v| string_list(Some(v))),
        exclude_tags: g
            .get("excludeTags")
            .filter(|v| v.is_array())
            .map(|v| string_list(Some(v))),
    }
}

fn legacy_groups(doc: &Value) -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: MAIN_GROUP_ID.to_string(),
            label: "Mains".to_string(),
            food_ids: id_list(doc.get("mains")),
            selection_preset: SelectionPreset::Pick1,
            order: 0,
            filter_tags: None,
            exclude_tags: None,
        },
        MenuGroup {
            id: SIDE_GROUP_ID.to_string(),
            label: "Sides".to_string(),
            food_ids: id_list(doc.get("sides")),
            selection_preset: SelectionPreset::Pick1To2,
            order: 1,
            filter_tags: None,
            exclude_tags: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn mains_and_sides_become_two_groups() {
        let menu = normalize_menu(&json!({
            "id": "m1",
            "name": "Weeknight",
            "mains": ["f1", "f2"],
            "sides": ["f3"]
        }));

        assert_eq!(menu.groups.len(), 2);
        assert_eq!(menu.groups[0].id, "main-group");
        assert_eq!(menu.groups[0].selection_preset, SelectionPreset::Pick1);
        assert_eq!(menu.groups[0].food_ids, vec!["f1", "f2"]);
        assert_eq!(menu.groups[1].id, "side-group");
        assert_eq!(menu.groups[1].selection_preset, SelectionPreset::Pick1To2);
        assert_eq!(menu.groups[1].food_ids, vec!["f3"]);
    }

    #[test]
    fn legacy_fields_do_not_survive() {
        let menu = normalize_menu(&json!({"id": "m1", "mains": ["f1"]}));
        let out = serde_json::to_value(&menu).unwrap();
        assert!(out.get("mains").is_none());
        assert!(out.get("sides").is_none());
        assert_eq!(out["groups"][1]["foodIds"], json!([]));
    }

    #[test]
    fn groups_win_over_legacy_fields() {
        let menu = normalize_menu(&json!({
            "id": "m2",
            "mains": ["stale"],
            "groups": [{
                "id": "g-fruit",
                "label": "Fruit",
                "foodIds": ["f9"],
                "selectionPreset": "pick-2-3",
                "order": 4,
                "filterTags": ["Fruit"]
            }]
        }));
        assert_eq!(menu.groups.len(), 1);
        let g = &menu.groups[0];
        assert_eq!(g.id, "g-fruit");
        assert_eq!(g.selection_preset, SelectionPreset::Pick2To3);
        assert_eq!(g.order, 4);
        assert_eq!(g.filter_tags.as_deref(), Some(&["Fruit".to_string()][..]));
        assert!(g.exclude_tags.is_none());
    }

    #[test]
    fn neither_shape_yields_no_groups() {
        let menu = normalize_menu(&json!({"id": "m3", "name": "Empty"}));
        assert!(menu.groups.is_empty());
        let menu = normalize_menu(&json!({"id": "m3", "groups": []}));
        assert!(menu.groups.is_empty());
    }

    #[test]
    fn group_defaults() {
        let menu = normalize_menu(&json!({
            "groups": [{"label": "A"}, {"label": "B", "selectionPreset": "pick-7"}]
        }));
        assert_eq!(menu.groups[0].id, "group-0");
        assert_eq!(menu.groups[1].order, 1);
        assert_eq!(menu.groups[1].selection_preset, SelectionPreset::Pick1);
    }

    #[test]
    fn timestamps_default_to_created() {
        let menu = normalize_menu(&json!({"createdAt": "2024-01-02T03:04:05Z", "presetSlot": 2}));
        assert_eq!(menu.created_at, 1_704_164_645_000);
        assert_eq!(menu.updated_at, menu.created_at);
        assert_eq!(menu.preset_slot, Some(2));
    }
}
