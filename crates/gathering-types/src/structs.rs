//! Source rows extracted from the game tables, and the export summary.
//!
//! These structs are plain data: they are produced by an external table
//! loader (usually as one JSON dump, see [`GatheringData`]) and consumed
//! read-only by the node aggregation in `gathering-nodes`. Coordinates are
//! integer map coordinates scaled by 100 ("centi-units"), so `1234`
//! means map coordinate `12.34`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ClientLanguage, GatheringType, NodeType};
use crate::ids::{
    AetheryteId, GatheringPointBaseId, GatheringPointId, ItemId, RarePopTimeTableId, TerritoryId,
};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A map position in centi-units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct MapPosition {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl MapPosition {
    /// Create a position from raw centi-unit coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Gathering tables
// ---------------------------------------------------------------------------

/// One row of the gathering point base table: a logical node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GatheringPointBaseRow {
    /// Source-table identifier.
    pub id: GatheringPointBaseId,
    /// Raw gathering type code (see [`GatheringType::from_code`]).
    pub gathering_type: u8,
    /// Required gathering level.
    pub level: u16,
    /// Gathering item rows this node can yield, in table order.
    #[serde(default)]
    pub items: Vec<ItemId>,
}

/// One entry of a rare pop time table.
///
/// Both values use the `HHMM`-like encoding, e.g. `1430` for 14:30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RarePopTimeSlot {
    /// Encoded start time.
    pub start_time: u16,
    /// Encoded duration. Zero marks an unused entry.
    pub duration: u16,
}

/// Spawn timetable of an unspoiled node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RarePopTimeTable {
    /// Source-table identifier.
    pub id: RarePopTimeTableId,
    /// Timetable entries.
    #[serde(default)]
    pub slots: Vec<RarePopTimeSlot>,
}

/// Timing information attached to a gathering point.
///
/// Ephemeral nodes carry a start/end window, unspoiled nodes reference a
/// rare pop time table. A point with neither is a regular node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GatheringPointTransientRow {
    /// Encoded ephemeral start time.
    #[serde(default)]
    pub ephemeral_start: u16,
    /// Encoded ephemeral end time.
    #[serde(default)]
    pub ephemeral_end: u16,
    /// Rare pop time table of an unspoiled node.
    #[serde(default)]
    pub rare_pop_time_table: Option<RarePopTimeTableId>,
}

impl GatheringPointTransientRow {
    /// Derive the node variant this timing information describes.
    pub const fn node_type(&self) -> NodeType {
        if self.rare_pop_time_table.is_some() {
            NodeType::Unspoiled
        } else if self.ephemeral_start != 0 || self.ephemeral_end != 0 {
            NodeType::Ephemeral
        } else {
            NodeType::Regular
        }
    }
}

/// One row of the gathering point table: a raw sighting of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GatheringPointRow {
    /// Source-table identifier of the sighting.
    pub id: GatheringPointId,
    /// The logical node this sighting belongs to.
    pub base: GatheringPointBaseId,
    /// Territory the sighting is located in.
    pub territory: TerritoryId,
    /// English place name of the area around the sighting.
    #[serde(default)]
    pub place_name: Option<String>,
    /// Timing information, if any.
    #[serde(default)]
    pub transient: Option<GatheringPointTransientRow>,
}

/// Observed in-world spawn positions of one gathering point.
///
/// A single gathering point may spawn at several overlapping copies of
/// the same spot; every copy is one entry of `positions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SightingRow {
    /// The gathering point that was observed.
    pub point: GatheringPointId,
    /// Observed spawn positions.
    #[serde(default)]
    pub positions: Vec<MapPosition>,
}

/// A manually maintained node position that can override aggregated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ManualPositionRow {
    /// The node this position applies to.
    pub base: GatheringPointBaseId,
    /// Closest aetheryte, if known.
    #[serde(default)]
    pub aetheryte: Option<AetheryteId>,
    /// Map position.
    pub position: MapPosition,
    /// Whether this position wins over aggregated sightings.
    #[serde(default)]
    pub prefer: bool,
    /// English place name to show for the node.
    #[serde(default)]
    pub place_name: Option<String>,
}

// ---------------------------------------------------------------------------
// World tables
// ---------------------------------------------------------------------------

/// One row of the territory table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TerritoryRow {
    /// Source-table identifier.
    pub id: TerritoryId,
    /// English territory name.
    pub name: String,
}

/// One row of the aetheryte table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AetheryteRow {
    /// Source-table identifier.
    pub id: AetheryteId,
    /// English aetheryte name.
    pub name: String,
    /// Territory the aetheryte stands in.
    pub territory: TerritoryId,
    /// Map position.
    pub position: MapPosition,
}

/// One row of the gathering item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemRow {
    /// Source-table identifier.
    pub id: ItemId,
    /// Display names by client language.
    #[serde(default)]
    pub names: BTreeMap<ClientLanguage, String>,
}

// ---------------------------------------------------------------------------
// Data dump
// ---------------------------------------------------------------------------

/// All source tables the node aggregation consumes.
///
/// Every section defaults to empty so partial dumps still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatheringData {
    /// Territory rows.
    #[serde(default)]
    pub territories: Vec<TerritoryRow>,
    /// Aetheryte rows; list order is the anchor order within a territory.
    #[serde(default)]
    pub aetherytes: Vec<AetheryteRow>,
    /// Gathering item rows.
    #[serde(default)]
    pub items: Vec<ItemRow>,
    /// Gathering point base rows.
    #[serde(default)]
    pub point_bases: Vec<GatheringPointBaseRow>,
    /// Gathering point rows.
    #[serde(default)]
    pub points: Vec<GatheringPointRow>,
    /// Rare pop time tables.
    #[serde(default)]
    pub rare_pop_tables: Vec<RarePopTimeTable>,
    /// Observed sightings.
    #[serde(default)]
    pub sightings: Vec<SightingRow>,
    /// Manual positions.
    #[serde(default)]
    pub manual_positions: Vec<ManualPositionRow>,
}

impl GatheringData {
    /// Parse a JSON data dump.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the dump is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Flattened, display-ready view of one resolved node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NodeSummary {
    /// Source-table identifier.
    pub id: GatheringPointBaseId,
    /// Gathering type.
    pub gathering_type: GatheringType,
    /// Node variant.
    pub node_type: NodeType,
    /// Required level.
    pub level: u16,
    /// Item names joined with `|`.
    pub items: String,
    /// 24 characters of `0`/`1`, hour 0 first.
    pub uptime: String,
    /// Human-readable up-ranges; empty when always up.
    pub hours: String,
    /// Whether the node is up at every hour.
    pub always_up: bool,
    /// Resolved horizontal coordinate.
    pub x: f64,
    /// Resolved vertical coordinate.
    pub y: f64,
    /// Name of the resolved closest aetheryte.
    pub aetheryte: Option<String>,
    /// Resolved place name.
    pub place_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_row_derives_node_type() {
        let regular = GatheringPointTransientRow::default();
        assert_eq!(regular.node_type(), NodeType::Regular);

        let ephemeral = GatheringPointTransientRow {
            ephemeral_start: 400,
            ephemeral_end: 800,
            rare_pop_time_table: None,
        };
        assert_eq!(ephemeral.node_type(), NodeType::Ephemeral);

        let unspoiled = GatheringPointTransientRow {
            ephemeral_start: 0,
            ephemeral_end: 0,
            rare_pop_time_table: Some(RarePopTimeTableId::new(3)),
        };
        assert_eq!(unspoiled.node_type(), NodeType::Unspoiled);
    }

    #[test]
    fn partial_dump_loads_with_defaults() {
        let json = r#"{
            "territories": [{ "id": 135, "name": "Lower La Noscea" }],
            "point_bases": [{ "id": 31, "gathering_type": 2, "level": 5 }]
        }"#;
        let data = GatheringData::from_json(json);
        assert!(data.is_ok());
        let data = data.unwrap_or_default();
        assert_eq!(data.territories.len(), 1);
        assert_eq!(data.point_bases.len(), 1);
        assert!(data.point_bases.iter().all(|row| row.items.is_empty()));
        assert!(data.sightings.is_empty());
    }

    #[test]
    fn item_names_key_by_language() {
        let json = r#"{ "id": 5, "names": { "english": "Copper Ore", "german": "Kupfererz" } }"#;
        let row: Result<ItemRow, _> = serde_json::from_str(json);
        let names = row.map(|r| r.names).unwrap_or_default();
        assert_eq!(
            names.get(&ClientLanguage::English).map(String::as_str),
            Some("Copper Ore")
        );
        assert_eq!(names.len(), 2);
    }
}
