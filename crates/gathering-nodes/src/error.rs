//! Error types for the `gathering-nodes` crate.
//!
//! All fallible operations in this crate return [`NodeError`]. Full item
//! slots and misplaced sightings are recoverable; the registry build logs
//! and skips them. Everything else aborts the build.

use gathering_types::{
    AetheryteId, GatheringPointBaseId, ItemId, RarePopTimeTableId, TerritoryId,
};

/// Errors that can occur while assembling or enriching nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// Every item slot of the node is occupied.
    ///
    /// Not fatal: the item is simply not recorded and the node keeps its
    /// previous slots.
    #[error("could not add item {item} to node {node}, all {capacity} slots are used")]
    SlotsFull {
        /// The node that ran out of slots.
        node: GatheringPointBaseId,
        /// The item that could not be placed.
        item: ItemId,
        /// Slot capacity of the node.
        capacity: usize,
    },

    /// The source row carries a gathering type code outside the known range.
    #[error("unknown gathering type code {0}")]
    UnknownGatheringType(u8),

    /// A territory was not found in the world registry.
    #[error("territory not found: {0}")]
    TerritoryNotFound(TerritoryId),

    /// An aetheryte was not found in the world registry.
    #[error("aetheryte not found: {0}")]
    AetheryteNotFound(AetheryteId),

    /// A sighting lies in a different territory than the node's earlier ones.
    #[error("node {node} lies in territory {expected}, sighting reports {found}")]
    TerritoryMismatch {
        /// The node receiving the sighting.
        node: GatheringPointBaseId,
        /// Territory of the node's existing sightings.
        expected: TerritoryId,
        /// Territory of the rejected sighting.
        found: TerritoryId,
    },

    /// A gathering point references a base row that does not exist.
    #[error("gathering point base not found: {0}")]
    PointBaseNotFound(GatheringPointBaseId),

    /// A transient row references a rare pop table that does not exist.
    #[error("rare pop time table not found: {0}")]
    RarePopTableNotFound(RarePopTimeTableId),

    /// A duplicate territory was inserted where uniqueness is required.
    #[error("duplicate territory id: {0}")]
    DuplicateTerritory(TerritoryId),

    /// A duplicate aetheryte was inserted where uniqueness is required.
    #[error("duplicate aetheryte id: {0}")]
    DuplicateAetheryte(AetheryteId),

    /// A duplicate base row was inserted where uniqueness is required.
    #[error("duplicate gathering point base id: {0}")]
    DuplicatePointBase(GatheringPointBaseId),
}
