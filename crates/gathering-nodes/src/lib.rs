//! Aggregation of raw gathering sightings into canonical nodes.
//!
//! Many raw gathering points map to one logical node. This crate merges
//! their sightings into a stable position, attaches the item slots and
//! uptime windows of the node, and resolves which of the manual or
//! aggregated coordinates and anchor is authoritative.
//!
//! # Modules
//!
//! - [`aggregate`] -- [`NodeLocation`] records and the [`LocationAggregate`]
//!   running average with its closest aetheryte.
//! - [`classifier`] -- Immutable [`NodeClassifier`] ordered by source id.
//! - [`eorzea`] -- The in-game clock.
//! - [`error`] -- Error types for node assembly.
//! - [`items`] -- The nine-slot [`ItemSlotSet`] and the item-to-node index.
//! - [`node`] -- The [`Node`] and the coordinate/anchor precedence rules.
//! - [`position`] -- Manual [`PositionOverride`]s.
//! - [`registry`] -- The load pass that builds every node from source rows.
//! - [`territory`] -- Territories, aetherytes, and nearest-anchor lookup.
//! - [`times`] -- The 24-hour [`TimeWindowSet`] uptime mask.

pub mod aggregate;
pub mod classifier;
pub mod eorzea;
pub mod error;
pub mod items;
pub mod node;
pub mod position;
pub mod registry;
pub mod territory;
pub mod times;

// Re-export primary types at crate root.
pub use aggregate::{LocationAggregate, NodeLocation};
pub use classifier::NodeClassifier;
pub use eorzea::EorzeaTime;
pub use error::NodeError;
pub use items::{Gatherable, ITEM_SLOTS, ItemIndex, ItemSlotSet, SlotInsertion};
pub use node::{Axis, Node, resolve_anchor, resolve_axis};
pub use position::PositionOverride;
pub use registry::{BuildStats, NodeRegistry};
pub use territory::{Aetheryte, Territory, WorldRegistry};
pub use times::{HOURS_PER_DAY, TimeWindowSet};
