//! Repository methods on [`PlateDb`](crate::PlateDb).
//!
//! Each module also exposes `pub(crate)` row writers taking a bare
//! connection, so the migrator can call them inside its own transaction and
//! produce exactly the rows the live paths produce.

pub mod food;
pub mod household;
pub mod kid_selection;
pub mod meal;
pub mod menu;
pub mod profile;
pub mod shared_menu;
