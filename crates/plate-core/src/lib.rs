//! # plate-core
//!
//! Core types, ID prefixes, and legacy document normalization for plateful.
//!
//! This crate provides the foundational types shared across all plateful crates:
//! - Canonical entity structs (foods, kid profiles, menus, meals, shared menus)
//! - Selection presets, completion levels, and the migrated table list
//! - ID prefix constants
//! - Cross-cutting error types
//! - Migration report types
//! - The legacy schema normalizer, used by the migrator and by live callers
//!   upgrading old cached payloads

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod normalize;
pub mod responses;
