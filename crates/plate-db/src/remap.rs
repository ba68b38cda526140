//! Legacy ID to new ID translation.
//!
//! Every migrated row gets a fresh prefixed ID. References embedded in JSON
//! (menu group food lists, selection maps, completion keys) and advisory
//! columns are rewritten through these maps. A miss keeps the original value
//! and is counted; nothing is ever dropped.

use std::collections::HashMap;

use plate_core::entities::{CompletionMap, MenuGroup, SelectionMap};

/// Mapping for one entity kind.
#[derive(Debug)]
pub struct IdMap {
    entity: &'static str,
    entries: HashMap<String, String>,
    misses: u32,
}

impl IdMap {
    #[must_use]
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            entries: HashMap::new(),
            misses: 0,
        }
    }

    pub fn insert(&mut self, legacy: impl Into<String>, new: impl Into<String>) {
        self.entries.insert(legacy.into(), new.into());
    }

    /// Exact lookup. Does not count a miss.
    #[must_use]
    pub fn get(&self, legacy: &str) -> Option<&str> {
        self.entries.get(legacy).map(String::as_str)
    }

    /// Translate `legacy`, keeping it verbatim when unmapped.
    pub fn remap(&mut self, legacy: &str) -> String {
        if let Some(new) = self.entries.get(legacy) {
            return new.clone();
        }
        self.misses += 1;
        tracing::warn!("remap: no {} mapping for '{}', keeping original", self.entity, legacy);
        legacy.to_string()
    }

    /// Number of `remap` calls that found no mapping.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }
}

/// One map per entity kind that other rows refer to.
#[derive(Debug)]
pub struct IdRemapper {
    pub foods: IdMap,
    pub profiles: IdMap,
    pub menus: IdMap,
    pub shared_menus: IdMap,
}

impl Default for IdRemapper {
    fn default() -> Self {
        Self {
            foods: IdMap::new("food"),
            profiles: IdMap::new("kid profile"),
            menus: IdMap::new("menu"),
            shared_menus: IdMap::new("shared menu"),
        }
    }
}

impl IdRemapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// References kept verbatim across all maps.
    #[must_use]
    pub fn dangling_refs(&self) -> u32 {
        self.foods.misses()
            + self.profiles.misses()
            + self.menus.misses()
            + self.shared_menus.misses()
    }
}

/// Rewrite every food ID inside menu groups.
#[must_use]
pub fn remap_group_food_ids(groups: Vec<MenuGroup>, foods: &mut IdMap) -> Vec<MenuGroup> {
    groups
        .into_iter()
        .map(|mut g| {
            g.food_ids = g.food_ids.iter().map(|id| foods.remap(id)).collect();
            g
        })
        .collect()
}

/// Rewrite the food IDs in a group-keyed selection map. Group keys are menu
/// local and stay as they are.
#[must_use]
pub fn remap_selections(selections: SelectionMap, foods: &mut IdMap) -> SelectionMap {
    selections
        .into_iter()
        .map(|(group, ids)| (group, ids.iter().map(|id| foods.remap(id)).collect()))
        .collect()
}

/// Rewrite the food ID keys of a completion map.
#[must_use]
pub fn remap_completion_keys(completions: CompletionMap, foods: &mut IdMap) -> CompletionMap {
    completions
        .into_iter()
        .map(|(food_id, level)| (foods.remap(&food_id), level))
        .collect()
}
