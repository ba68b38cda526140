//! Selection presets, completion levels, legacy categories, and the migrated
//! table list.
//!
//! Enums stored in SQL or JSON use the exact wire strings of the historical
//! documents (`pick-1-2`, `all`, `some`) via `#[serde(rename = ...)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SelectionPreset
// ---------------------------------------------------------------------------

/// Rule bounding how many options a kid may choose from one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SelectionPreset {
    #[default]
    #[serde(rename = "pick-1")]
    Pick1,
    #[serde(rename = "pick-1-2")]
    Pick1To2,
    #[serde(rename = "pick-2")]
    Pick2,
    #[serde(rename = "pick-2-3")]
    Pick2To3,
}

impl SelectionPreset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pick1 => "pick-1",
            Self::Pick1To2 => "pick-1-2",
            Self::Pick2 => "pick-2",
            Self::Pick2To3 => "pick-2-3",
        }
    }
}

impl fmt::Display for SelectionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pick-1" => Ok(Self::Pick1),
            "pick-1-2" => Ok(Self::Pick1To2),
            "pick-2" => Ok(Self::Pick2),
            "pick-2-3" => Ok(Self::Pick2To3),
            other => Err(CoreError::UnknownVariant {
                kind: "selection preset",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// How much of one food a kid finished, as recorded in a meal review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Completion {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "some")]
    Partial,
    #[serde(rename = "none")]
    Untouched,
}

impl Completion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Partial => "some",
            Self::Untouched => "none",
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Completion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "some" => Ok(Self::Partial),
            "none" => Ok(Self::Untouched),
            other => Err(CoreError::UnknownVariant {
                kind: "completion",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// LegacyCategory
// ---------------------------------------------------------------------------

/// The single-valued category carried by pre-tag food documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LegacyCategory {
    Main,
    Side,
}

impl LegacyCategory {
    /// The tag that replaces this category in canonical documents.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Main => "Protein",
            Self::Side => "Veggie",
        }
    }

    /// Parse the legacy wire string. Unknown strings yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "main" => Some(Self::Main),
            "side" => Some(Self::Side),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A target table of the relational store.
///
/// `ALL` lists tables in load order: every table appears after the tables
/// it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Households,
    FoodItems,
    KidProfiles,
    Menus,
    KidSelections,
    MealRecords,
    MealSelections,
    MealReviews,
    SharedMenus,
    SharedMenuResponses,
}

impl Table {
    pub const ALL: [Self; 10] = [
        Self::Households,
        Self::FoodItems,
        Self::KidProfiles,
        Self::Menus,
        Self::KidSelections,
        Self::MealRecords,
        Self::MealSelections,
        Self::MealReviews,
        Self::SharedMenus,
        Self::SharedMenuResponses,
    ];

    /// SQL table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Households => "households",
            Self::FoodItems => "food_items",
            Self::KidProfiles => "kid_profiles",
            Self::Menus => "menus",
            Self::KidSelections => "kid_selections",
            Self::MealRecords => "meal_records",
            Self::MealSelections => "meal_selections",
            Self::MealReviews => "meal_reviews",
            Self::SharedMenus => "shared_menus",
            Self::SharedMenuResponses => "shared_menu_responses",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SelectionPreset::Pick1, "pick-1")]
    #[case(SelectionPreset::Pick1To2, "pick-1-2")]
    #[case(SelectionPreset::Pick2, "pick-2")]
    #[case(SelectionPreset::Pick2To3, "pick-2-3")]
    fn preset_wire_strings(#[case] preset: SelectionPreset, #[case] wire: &str) {
        assert_eq!(preset.as_str(), wire);
        assert_eq!(wire.parse::<SelectionPreset>().unwrap(), preset);
        assert_eq!(
            serde_json::to_value(preset).unwrap(),
            serde_json::Value::String(wire.to_string())
        );
    }

    #[test]
    fn unknown_preset_rejected() {
        let err = "pick-9".parse::<SelectionPreset>().unwrap_err();
        assert!(err.to_string().contains("pick-9"));
    }

    #[test]
    fn completion_uses_legacy_words() {
        assert_eq!(Completion::Partial.as_str(), "some");
        assert_eq!("none".parse::<Completion>().unwrap(), Completion::Untouched);
        let parsed: Completion = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, Completion::All);
    }

    #[test]
    fn legacy_category_tags() {
        assert_eq!(LegacyCategory::parse("main").map(LegacyCategory::tag), Some("Protein"));
        assert_eq!(LegacyCategory::parse("side").map(LegacyCategory::tag), Some("Veggie"));
        assert_eq!(LegacyCategory::parse("dessert"), None);
    }

    #[test]
    fn tables_listed_parents_first() {
        let pos = |t: Table| Table::ALL.iter().position(|x| *x == t).unwrap();
        assert!(pos(Table::Households) < pos(Table::FoodItems));
        assert!(pos(Table::Menus) < pos(Table::KidSelections));
        assert!(pos(Table::MealRecords) < pos(Table::MealReviews));
        assert!(pos(Table::SharedMenus) < pos(Table::SharedMenuResponses));
    }
}
