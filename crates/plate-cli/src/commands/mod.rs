pub mod dispatch;
pub mod meals;
pub mod migrate;
pub mod share;
