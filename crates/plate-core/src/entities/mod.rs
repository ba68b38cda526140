//! Canonical entity structs for all plateful domain objects.
//!
//! Each entity maps to a table in the libSQL store. Field names serialize
//! in camelCase, the shape browser clients and legacy documents use. All
//! structs derive `Serialize`, `Deserialize`, and `JsonSchema`.
//!
//! Timestamps are epoch milliseconds throughout.

mod food;
mod household;
mod meal;
mod menu;
mod profile;
mod selection;
mod shared_menu;

pub use food::FoodItem;
pub use household::Household;
pub use meal::{CompletionMap, MealRecord, MealReview, MealSelection};
pub use menu::{Menu, MenuGroup};
pub use profile::KidProfile;
pub use selection::{KidSelection, SelectionMap};
pub use shared_menu::{SharedMenu, SharedMenuGroup, SharedMenuOption, SharedMenuResponse};
