//! Shared type definitions for gathering node aggregation.
//!
//! This crate holds the already-loaded source rows the aggregation consumes
//! and the summary it exports. Types flow downstream to `TypeScript` via
//! `ts-rs` for the map UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe row-number wrappers for every source table
//! - [`enums`] -- Gathering types, node variants, client languages
//! - [`structs`] -- Source rows, the JSON data dump, and [`NodeSummary`]

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ClientLanguage, GatheringType, NodeType};
pub use ids::{
    AetheryteId, GatheringPointBaseId, GatheringPointId, ItemId, RarePopTimeTableId, TerritoryId,
};
pub use structs::{
    AetheryteRow, GatheringData, GatheringPointBaseRow, GatheringPointRow,
    GatheringPointTransientRow, ItemRow, ManualPositionRow, MapPosition, NodeSummary,
    RarePopTimeSlot, RarePopTimeTable, SightingRow, TerritoryRow,
};
