//! ID prefix constants.
//!
//! Every row ID is `{prefix}-{8 hex chars}`, generated by the database with
//! `randomblob(4)`. Legacy IDs are kept verbatim in each table's `legacy_id`
//! column and never reformatted.

pub const PREFIX_HOUSEHOLD: &str = "hh";
pub const PREFIX_FOOD: &str = "fd";
pub const PREFIX_KID: &str = "kid";
pub const PREFIX_MENU: &str = "mnu";
pub const PREFIX_KID_SELECTION: &str = "ksl";
pub const PREFIX_MEAL: &str = "mea";
pub const PREFIX_MEAL_SELECTION: &str = "msl";
pub const PREFIX_MEAL_REVIEW: &str = "mrv";
pub const PREFIX_SHARED_MENU: &str = "shm";
pub const PREFIX_SHARED_RESPONSE: &str = "rsp";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_HOUSEHOLD,
    PREFIX_FOOD,
    PREFIX_KID,
    PREFIX_MENU,
    PREFIX_KID_SELECTION,
    PREFIX_MEAL,
    PREFIX_MEAL_SELECTION,
    PREFIX_MEAL_REVIEW,
    PREFIX_SHARED_MENU,
    PREFIX_SHARED_RESPONSE,
];

/// Fixed group ID synthesized for legacy `mains` / `mainId` fields.
pub const MAIN_GROUP_ID: &str = "main-group";

/// Fixed group ID synthesized for legacy `sides` / `sideIds` fields.
pub const SIDE_GROUP_ID: &str = "side-group";
