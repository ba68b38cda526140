use serde_json::Value;

use super::{
    bool_field, id_field, int_field, normalize_selection_map, opt_string_field, string_field,
    timestamp_field,
};
use crate::entities::{SharedMenu, SharedMenuGroup, SharedMenuOption, SharedMenuResponse};

/// Normalize a shared menu document.
///
/// Early shared menus stored options as bare strings and had no `isActive`
/// flag; those become ordered option objects and active menus.
#[must_use]
pub fn normalize_shared_menu(doc: &Value) -> SharedMenu {
    let groups = doc
        .get("groups")
        .and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .enumerate()
                .map(|(idx, g)| normalize_group(g, idx))
                .collect()
        })
        .unwrap_or_default();

    SharedMenu {
        id: id_field(doc, "id").unwrap_or_default(),
        token: string_field(doc, "token"),
        title: string_field(doc, "title"),
        description: opt_string_field(doc, "description"),
        groups,
        is_active: bool_field(doc, "isActive").unwrap_or(true),
        created_at: timestamp_field(doc, "createdAt").unwrap_or(0),
    }
}

fn position(idx: usize) -> i64 {
    i64::try_from(idx).unwrap_or(i64::MAX)
}

fn normalize_group(g: &Value, idx: usize) -> SharedMenuGroup {
    let options = g
        .get("options")
        .and_then(Value::as_array)
        .map(|opts| {
            opts.iter()
                .enumerate()
                .map(|(i, o)| normalize_option(o, i))
                .collect()
        })
        .unwrap_or_default();

    SharedMenuGroup {
        id: id_field(g, "id").unwrap_or_else(|| format!("group-{idx}")),
        label: string_field(g, "label"),
        options,
        selection_preset: g
            .get("selectionPreset")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        order: int_field(g, "order").unwrap_or_else(|| position(idx)),
    }
}

fn normalize_option(o: &Value, idx: usize) -> SharedMenuOption {
    if let Some(text) = o.as_str() {
        return SharedMenuOption {
            id: format!("opt-{idx}"),
            text: text.to_string(),
            image_url: None,
            order: position(idx),
        };
    }
    SharedMenuOption {
        id: id_field(o, "id").unwrap_or_else(|| format!("opt-{idx}")),
        text: string_field(o, "text"),
        image_url: opt_string_field(o, "imageUrl"),
        order: int_field(o, "order").unwrap_or_else(|| position(idx)),
    }
}

#[must_use]
pub fn normalize_shared_menu_response(doc: &Value) -> SharedMenuResponse {
    SharedMenuResponse {
        id: id_field(doc, "id").unwrap_or_default(),
        menu_id: id_field(doc, "menuId").unwrap_or_default(),
        respondent_name: string_field(doc, "respondentName"),
        selections: normalize_selection_map(doc),
        timestamp: timestamp_field(doc, "timestamp").unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::SelectionPreset;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn string_options_become_objects() {
        let menu = normalize_shared_menu(&json!({
            "id": "s1",
            "token": "abc",
            "title": "Party",
            "groups": [{"id": "g1", "label": "Drinks", "options": ["Juice", "Milk"]}]
        }));
        assert!(menu.is_active);
        let opts = &menu.groups[0].options;
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[1].id, "opt-1");
        assert_eq!(opts[1].text, "Milk");
        assert_eq!(opts[1].order, 1);
    }

    #[test]
    fn full_shape_is_kept() {
        let menu = normalize_shared_menu(&json!({
            "id": "s2",
            "token": "tok",
            "title": "Picnic",
            "description": "Sat",
            "isActive": false,
            "createdAt": 5,
            "groups": [{
                "id": "g1",
                "label": "Mains",
                "selectionPreset": "pick-2",
                "order": 3,
                "options": [{"id": "o1", "text": "Wrap", "imageUrl": "/w.png", "order": 9}]
            }]
        }));
        assert!(!menu.is_active);
        assert_eq!(menu.created_at, 5);
        assert_eq!(menu.groups[0].selection_preset, SelectionPreset::Pick2);
        assert_eq!(menu.groups[0].order, 3);
        assert_eq!(menu.groups[0].options[0].image_url.as_deref(), Some("/w.png"));
        assert_eq!(menu.groups[0].options[0].order, 9);
    }

    #[test]
    fn response_reads_selections() {
        let rsp = normalize_shared_menu_response(&json!({
            "id": "r1",
            "menuId": "s1",
            "respondentName": "Gran",
            "selections": {"g1": ["o1", "o2"]},
            "timestamp": "2024-01-02T03:04:05Z"
        }));
        assert_eq!(rsp.menu_id, "s1");
        assert_eq!(rsp.selections["g1"], vec!["o1", "o2"]);
        assert_eq!(rsp.timestamp, 1_704_164_645_000);
    }
}
