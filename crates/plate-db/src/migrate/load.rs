//! Per-collection loaders.
//!
//! Each loader normalizes its documents, remaps embedded references through
//! the maps filled by earlier loaders, inserts through the shared row
//! writers, and records both the new ID and the insert count. Collections run
//! in dependency order so every map a loader reads is already complete.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use plate_core::enums::Table;
use plate_core::normalize::{
    has_unrecoverable_main_completion, normalize_food, normalize_kid_selection, normalize_meal,
    normalize_menu, normalize_profile, normalize_shared_menu, normalize_shared_menu_response,
};

use crate::error::MigrationError;
use crate::remap::{IdRemapper, remap_completion_keys, remap_group_food_ids, remap_selections};
use crate::repos::food::insert_food;
use crate::repos::household::{insert_household, update_active_menu};
use crate::repos::kid_selection::insert_kid_selection;
use crate::repos::meal::{insert_meal_record, insert_meal_review, insert_meal_selection};
use crate::repos::menu::insert_menu;
use crate::repos::profile::insert_kid_profile;
use crate::repos::shared_menu::{insert_shared_menu, insert_shared_menu_response};

/// State scoped to one migration run.
pub(crate) struct LoadContext<'a> {
    conn: &'a libsql::Connection,
    household_id: String,
    pub(crate) remapper: IdRemapper,
    pub(crate) inserted: BTreeMap<Table, u64>,
    pub(crate) skipped: u32,
    pub(crate) dropped_main_completions: u32,
}

fn legacy(id: &str) -> Option<&str> {
    (!id.is_empty()).then_some(id)
}

fn position(idx: usize) -> i64 {
    i64::try_from(idx).unwrap_or(i64::MAX)
}

impl<'a> LoadContext<'a> {
    /// Insert the household every migrated row belongs to.
    pub(crate) async fn begin(
        conn: &'a libsql::Connection,
        household_name: &str,
    ) -> Result<Self, MigrationError> {
        let household_id = insert_household(conn, household_name).await?;
        let mut ctx = Self {
            conn,
            household_id,
            remapper: IdRemapper::new(),
            inserted: BTreeMap::new(),
            skipped: 0,
            dropped_main_completions: 0,
        };
        ctx.record(Table::Households);
        Ok(ctx)
    }

    fn record(&mut self, table: Table) {
        *self.inserted.entry(table).or_insert(0) += 1;
    }

    fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Entries that are not JSON objects carry no fields to load.
    fn skip_non_object(&mut self, doc: &Value, table: Table) -> bool {
        if doc.is_object() {
            return false;
        }
        tracing::warn!("migrate: skipping non-object {} entry: {}", table, doc);
        self.skip();
        true
    }

    fn done(&self, table: Table) {
        tracing::info!(
            "migrate: {} loaded ({} rows)",
            table,
            self.inserted.get(&table).copied().unwrap_or(0)
        );
    }

    pub(crate) async fn load_foods(&mut self, docs: &[Value]) -> Result<(), MigrationError> {
        for doc in docs {
            if self.skip_non_object(doc, Table::FoodItems) {
                continue;
            }
            let food = normalize_food(doc);
            let new_id = insert_food(self.conn, &self.household_id, legacy(&food.id), &food).await?;
            self.record(Table::FoodItems);
            if !food.id.is_empty() {
                self.remapper.foods.insert(food.id, new_id);
            }
        }
        self.done(Table::FoodItems);
        Ok(())
    }

    pub(crate) async fn load_profiles(&mut self, docs: &[Value]) -> Result<(), MigrationError> {
        for doc in docs {
            if self.skip_non_object(doc, Table::KidProfiles) {
                continue;
            }
            let profile = normalize_profile(doc);
            let new_id =
                insert_kid_profile(self.conn, &self.household_id, legacy(&profile.id), &profile)
                    .await?;
            self.record(Table::KidProfiles);
            if !profile.id.is_empty() {
                self.remapper.profiles.insert(profile.id, new_id);
            }
        }
        self.done(Table::KidProfiles);
        Ok(())
    }

    pub(crate) async fn load_menus(&mut self, docs: &[Value]) -> Result<(), MigrationError> {
        for doc in docs {
            if self.skip_non_object(doc, Table::Menus) {
                continue;
            }
            let mut menu = normalize_menu(doc);
            menu.groups = remap_group_food_ids(menu.groups, &mut self.remapper.foods);
            let new_id = insert_menu(self.conn, &self.household_id, legacy(&menu.id), &menu).await?;
            self.record(Table::Menus);
            if !menu.id.is_empty() {
                self.remapper.menus.insert(menu.id, new_id);
            }
        }
        self.done(Table::Menus);
        Ok(())
    }

    /// Point the household at its active menu. Runs after menus are loaded.
    /// An unresolvable pointer is left NULL.
    pub(crate) async fn apply_active_menu(
        &self,
        legacy_menu_id: Option<&str>,
    ) -> Result<(), MigrationError> {
        let Some(legacy_menu_id) = legacy_menu_id else {
            return Ok(());
        };
        match self.remapper.menus.get(legacy_menu_id) {
            Some(new_id) => {
                update_active_menu(self.conn, &self.household_id, Some(new_id)).await?;
            }
            None => {
                tracing::warn!(
                    "migrate: active menu '{}' was not migrated; household has no active menu",
                    legacy_menu_id
                );
            }
        }
        Ok(())
    }

    /// Kid selections reference a kid profile by FK, so a selection for an
    /// unknown kid cannot be kept and is skipped. Only the first selection
    /// per kid is loaded.
    pub(crate) async fn load_kid_selections(
        &mut self,
        docs: &[Value],
    ) -> Result<(), MigrationError> {
        let mut seen = HashSet::new();
        for doc in docs {
            if self.skip_non_object(doc, Table::KidSelections) {
                continue;
            }
            let sel = normalize_kid_selection(doc);
            let Some(kid_id) = self.remapper.profiles.get(&sel.kid_id).map(String::from) else {
                tracing::warn!("migrate: skipping selection for unknown kid '{}'", sel.kid_id);
                self.skip();
                continue;
            };
            if !seen.insert(kid_id.clone()) {
                tracing::warn!("migrate: skipping duplicate selection for kid '{}'", sel.kid_id);
                self.skip();
                continue;
            }

            let selections = remap_selections(sel.selections, &mut self.remapper.foods);
            insert_kid_selection(
                self.conn,
                &self.household_id,
                &kid_id,
                legacy(&sel.kid_id),
                &selections,
            )
            .await?;
            self.record(Table::KidSelections);
        }
        self.done(Table::KidSelections);
        Ok(())
    }

    /// Meals with their nested selections and reviews. `kidName` snapshots
    /// are written as recorded, never refreshed from current profiles.
    pub(crate) async fn load_meals(&mut self, docs: &[Value]) -> Result<(), MigrationError> {
        for doc in docs {
            if self.skip_non_object(doc, Table::MealRecords) {
                continue;
            }
            let dropped = count_dropped_main_completions(doc);
            if dropped > 0 {
                let meal_id = doc.get("id").and_then(Value::as_str).unwrap_or("?");
                tracing::warn!(
                    "migrate: meal '{}': dropping {} mainCompletion value(s) with no food id",
                    meal_id,
                    dropped
                );
                self.dropped_main_completions += dropped;
            }

            let meal = normalize_meal(doc);
            let menu_id = meal.menu_id.as_deref().map(|id| self.remapper.menus.remap(id));
            let meal_id = insert_meal_record(
                self.conn,
                &self.household_id,
                legacy(&meal.id),
                menu_id.as_deref(),
                &meal.date,
                meal.completed_at,
            )
            .await?;
            self.record(Table::MealRecords);

            for (idx, mut sel) in meal.selections.into_iter().enumerate() {
                sel.kid_id = sel.kid_id.map(|id| self.remapper.profiles.remap(&id));
                sel.selections = remap_selections(sel.selections, &mut self.remapper.foods);
                let child_legacy = format!("{}/selection/{idx}", meal.id);
                insert_meal_selection(self.conn, &meal_id, Some(child_legacy.as_str()), position(idx), &sel)
                    .await?;
                self.record(Table::MealSelections);
            }

            for (idx, mut rev) in meal.reviews.into_iter().enumerate() {
                rev.kid_id = rev.kid_id.map(|id| self.remapper.profiles.remap(&id));
                rev.completions = remap_completion_keys(rev.completions, &mut self.remapper.foods);
                let child_legacy = format!("{}/review/{idx}", meal.id);
                insert_meal_review(self.conn, &meal_id, Some(child_legacy.as_str()), position(idx), &rev)
                    .await?;
                self.record(Table::MealReviews);
            }
        }
        self.done(Table::MealRecords);
        Ok(())
    }

    /// Shared menus keep their legacy token unless it collides.
    pub(crate) async fn load_shared_menus(&mut self, docs: &[Value]) -> Result<(), MigrationError> {
        for doc in docs {
            if self.skip_non_object(doc, Table::SharedMenus) {
                continue;
            }
            let menu = normalize_shared_menu(doc);
            let (new_id, token) = insert_shared_menu(
                self.conn,
                &self.household_id,
                legacy(&menu.id),
                &menu,
                legacy(&menu.token),
            )
            .await?;
            if token != menu.token {
                tracing::warn!(
                    "migrate: shared menu '{}' re-issued token (legacy token '{}' unusable)",
                    menu.id,
                    menu.token
                );
            }
            self.record(Table::SharedMenus);
            if !menu.id.is_empty() {
                self.remapper.shared_menus.insert(menu.id, new_id);
            }
        }
        self.done(Table::SharedMenus);
        Ok(())
    }

    /// Responses whose menu did not migrate are skipped.
    pub(crate) async fn load_shared_menu_responses(
        &mut self,
        docs: &[Value],
    ) -> Result<(), MigrationError> {
        for doc in docs {
            if self.skip_non_object(doc, Table::SharedMenuResponses) {
                continue;
            }
            let rsp = normalize_shared_menu_response(doc);
            let Some(menu_id) = self.remapper.shared_menus.get(&rsp.menu_id).map(String::from)
            else {
                tracing::warn!(
                    "migrate: skipping response '{}' for unknown shared menu '{}'",
                    rsp.id,
                    rsp.menu_id
                );
                self.skip();
                continue;
            };
            insert_shared_menu_response(self.conn, &menu_id, legacy(&rsp.id), &rsp).await?;
            self.record(Table::SharedMenuResponses);
        }
        self.done(Table::SharedMenuResponses);
        Ok(())
    }
}

fn count_dropped_main_completions(doc: &Value) -> u32 {
    let count = doc
        .get("reviews")
        .and_then(Value::as_array)
        .map_or(0, |reviews| {
            reviews
                .iter()
                .filter(|r| has_unrecoverable_main_completion(r))
                .count()
        });
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_only_legacy_main_completions() {
        let doc = json!({
            "reviews": [
                {"mainCompletion": "all", "sideCompletions": {}},
                {"completions": {"f1": "all"}, "mainCompletion": "some"},
                {"sideCompletions": {"f2": "none"}}
            ]
        });
        assert_eq!(count_dropped_main_completions(&doc), 1);
        assert_eq!(count_dropped_main_completions(&json!({})), 0);
    }

    #[test]
    fn empty_legacy_id_is_none() {
        assert_eq!(legacy(""), None);
        assert_eq!(legacy("f1"), Some("f1"));
    }
}
