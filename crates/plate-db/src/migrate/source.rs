//! Legacy document snapshot.
//!
//! The legacy store kept one JSON file per collection. Each file is optional
//! and may be either a bare array or an object wrapping the array. Reading a
//! snapshot never fails: a missing, unparsable or wrongly shaped file is
//! logged, counted, and treated as empty.

use std::path::Path;

use serde_json::Value;

pub const FOODS_FILE: &str = "foods.json";
pub const PROFILES_FILE: &str = "profiles.json";
pub const MENUS_FILE: &str = "menus.json";
pub const MEALS_FILE: &str = "meals.json";
pub const SHARED_MENUS_FILE: &str = "shared-menus.json";

/// Raw legacy documents, not yet normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSnapshot {
    pub foods: Vec<Value>,
    pub profiles: Vec<Value>,
    pub menus: Vec<Value>,
    /// Legacy ID of the household's active menu.
    pub active_menu_id: Option<String>,
    /// One document per kid, each carrying `kidId`.
    pub kid_selections: Vec<Value>,
    pub meals: Vec<Value>,
    pub shared_menus: Vec<Value>,
    /// Each carrying `menuId`.
    pub shared_menu_responses: Vec<Value>,
    /// Files or keys that were missing, unparsable, or wrongly shaped.
    pub warnings: u32,
}

impl SourceSnapshot {
    /// Read every collection file under `dir`.
    #[must_use]
    pub fn load_dir(dir: &Path) -> Self {
        let mut snapshot = Self::default();

        if let Some(doc) = snapshot.read_file(dir, FOODS_FILE) {
            snapshot.foods = snapshot.file_collection(&doc, "foods", FOODS_FILE);
        }
        if let Some(doc) = snapshot.read_file(dir, PROFILES_FILE) {
            snapshot.profiles = snapshot.file_collection(&doc, "profiles", PROFILES_FILE);
        }
        if let Some(doc) = snapshot.read_file(dir, MENUS_FILE) {
            snapshot.menus = snapshot.file_collection(&doc, "menus", MENUS_FILE);
            snapshot.active_menu_id = id_string(doc.get("activeMenuId"));
            snapshot.kid_selections = kid_selections(doc.get("kidSelections"));
        }
        if let Some(doc) = snapshot.read_file(dir, MEALS_FILE) {
            snapshot.meals = snapshot.file_collection(&doc, "meals", MEALS_FILE);
        }
        if let Some(doc) = snapshot.read_file(dir, SHARED_MENUS_FILE) {
            let menus = snapshot.file_collection(&doc, "menus", SHARED_MENUS_FILE);
            snapshot.set_shared_menus(menus, doc.get("responses"));
        }

        tracing::info!(
            "snapshot: {} foods, {} profiles, {} menus, {} meals, {} shared menus ({} warnings)",
            snapshot.foods.len(),
            snapshot.profiles.len(),
            snapshot.menus.len(),
            snapshot.meals.len(),
            snapshot.shared_menus.len(),
            snapshot.warnings
        );
        snapshot
    }

    /// Build from one combined object with camelCase collection keys
    /// (`foods`, `profiles`, `menus`, `activeMenuId`, `kidSelections`,
    /// `meals`, `sharedMenus`, `sharedMenuResponses`). Absent keys are empty.
    #[must_use]
    pub fn from_value(doc: &Value) -> Self {
        let mut snapshot = Self {
            active_menu_id: id_string(doc.get("activeMenuId")),
            kid_selections: kid_selections(doc.get("kidSelections")),
            ..Self::default()
        };
        snapshot.foods = snapshot.field_collection(doc, "foods");
        snapshot.profiles = snapshot.field_collection(doc, "profiles");
        snapshot.menus = snapshot.field_collection(doc, "menus");
        snapshot.meals = snapshot.field_collection(doc, "meals");
        let shared = snapshot.field_collection(doc, "sharedMenus");
        snapshot.set_shared_menus(shared, doc.get("sharedMenuResponses"));
        snapshot
    }

    /// A bare array, or the array under `key`. Any other shape is a warning.
    fn file_collection(&mut self, doc: &Value, key: &str, file: &str) -> Vec<Value> {
        match (doc, doc.get(key)) {
            (Value::Array(items), _) | (_, Some(Value::Array(items))) => items.clone(),
            _ => {
                tracing::warn!(
                    "snapshot: {} is neither an array nor an object with a '{}' array; treating as empty",
                    file,
                    key
                );
                self.warnings += 1;
                Vec::new()
            }
        }
    }

    /// The array under `key`. Absent is empty; any other shape is a warning.
    fn field_collection(&mut self, doc: &Value, key: &str) -> Vec<Value> {
        match doc.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                tracing::warn!("snapshot: '{}' is not an array; treating as empty", key);
                self.warnings += 1;
                Vec::new()
            }
        }
    }

    fn read_file(&mut self, dir: &Path, name: &str) -> Option<Value> {
        let path = dir.join(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("snapshot: cannot read {}: {}; treating as empty", path.display(), e);
                self.warnings += 1;
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!("snapshot: {} is not valid JSON: {}; treating as empty", path.display(), e);
                self.warnings += 1;
                None
            }
        }
    }

    /// Store shared menus, lifting any per-menu `responses` arrays into the
    /// flat response list with `menuId` filled in.
    fn set_shared_menus(&mut self, menus: Vec<Value>, top_level: Option<&Value>) {
        let mut responses: Vec<Value> = top_level
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        self.shared_menus = menus
            .into_iter()
            .map(|mut menu| {
                let menu_id = id_string(menu.get("id"));
                if let Some(Value::Array(nested)) =
                    menu.as_object_mut().and_then(|m| m.remove("responses"))
                {
                    for rsp in nested {
                        responses.push(with_default(rsp, "menuId", menu_id.as_deref()));
                    }
                }
                menu
            })
            .collect();
        self.shared_menu_responses = responses;
    }
}

fn id_string(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Kid selections were stored either keyed by kid ID or as a list.
fn kid_selections(v: Option<&Value>) -> Vec<Value> {
    match v {
        Some(Value::Object(by_kid)) => by_kid
            .iter()
            .map(|(kid_id, sel)| with_default(sel.clone(), "kidId", Some(kid_id)))
            .collect(),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn with_default(mut doc: Value, key: &str, value: Option<&str>) -> Value {
    if let (Some(obj), Some(value)) = (doc.as_object_mut(), value) {
        obj.entry(key)
            .or_insert_with(|| Value::String(value.to_string()));
    }
    doc
}
