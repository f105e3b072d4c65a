//! The load/enrichment pass that turns source tables into nodes.
//!
//! [`NodeRegistry::build`] runs once per loaded data set, in this order:
//!
//! 1. Build the [`WorldRegistry`] and the [`ItemIndex`].
//! 2. For every gathering point, create its node on first sight
//!    (classification and uptime from the base and transient rows) and add
//!    the point's sighting to the node's aggregate.
//! 3. Place every base row's items into the node's slots.
//! 4. Apply manual positions.
//!
//! Data integrity problems (unknown base rows, territories, gathering
//! types, rare pop tables) abort the build. Full item slots and sightings
//! in the wrong territory are logged and skipped.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use gathering_types::{
    GatheringData, GatheringPointBaseId, GatheringPointBaseRow, GatheringPointId,
    GatheringPointTransientRow, ItemId, NodeSummary, NodeType, RarePopTimeTable,
    RarePopTimeTableId, TerritoryId,
};
use tracing::{debug, info, warn};

use crate::aggregate::NodeLocation;
use crate::classifier::NodeClassifier;
use crate::eorzea::EorzeaTime;
use crate::error::NodeError;
use crate::items::{ItemIndex, SlotInsertion};
use crate::node::Node;
use crate::position::PositionOverride;
use crate::territory::WorldRegistry;
use crate::times::TimeWindowSet;

/// Counters collected while building a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Nodes created.
    pub nodes: usize,
    /// Sightings that changed an aggregate.
    pub sightings: usize,
    /// Sightings rejected for lying in another territory.
    pub skipped_sightings: usize,
    /// Items placed into a slot.
    pub items_placed: usize,
    /// Items rejected because every slot was used.
    pub items_rejected: usize,
    /// Item ids not present in the item table.
    pub unknown_items: usize,
    /// Manual positions applied.
    pub manual_positions: usize,
}

/// All nodes of a loaded data set, in node order.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    /// Nodes by source-table identifier.
    nodes: BTreeMap<GatheringPointBaseId, Node>,
    /// Item catalogue and item-to-node index.
    items: ItemIndex,
    /// Territories and aetherytes.
    world: WorldRegistry,
    /// Build counters.
    stats: BuildStats,
}

impl NodeRegistry {
    /// Assemble every node from the source tables.
    ///
    /// # Errors
    ///
    /// Returns a [`NodeError`] if the tables reference rows that do not
    /// exist or contain duplicate ids.
    pub fn build(data: &GatheringData) -> Result<Self, NodeError> {
        let world = WorldRegistry::from_data(data)?;
        let items = ItemIndex::from_rows(&data.items);

        let mut bases: BTreeMap<GatheringPointBaseId, &GatheringPointBaseRow> = BTreeMap::new();
        for row in &data.point_bases {
            if bases.insert(row.id, row).is_some() {
                return Err(NodeError::DuplicatePointBase(row.id));
            }
        }
        let tables: BTreeMap<RarePopTimeTableId, &RarePopTimeTable> = data
            .rare_pop_tables
            .iter()
            .map(|table| (table.id, table))
            .collect();

        let mut sightings: BTreeMap<GatheringPointId, NodeLocation> = BTreeMap::new();
        for row in &data.sightings {
            let location = NodeLocation::from_row(row);
            match sightings.entry(row.point) {
                Entry::Occupied(mut existing) => {
                    existing.get_mut().absorb(&location);
                }
                Entry::Vacant(slot) => {
                    slot.insert(location);
                }
            }
        }

        let mut registry = Self {
            nodes: BTreeMap::new(),
            items,
            world,
            stats: BuildStats::default(),
        };

        for point in &data.points {
            let base = bases
                .get(&point.base)
                .ok_or(NodeError::PointBaseNotFound(point.base))?;
            if let Entry::Vacant(slot) = registry.nodes.entry(base.id) {
                slot.insert(create_node(base, point.transient.as_ref(), &tables)?);
                registry.stats.nodes = registry.stats.nodes.saturating_add(1);
            }
            let location = sightings
                .get(&point.id)
                .cloned()
                .unwrap_or_default()
                .with_place_name(point.place_name.clone());
            registry.add_sighting(base.id, point.territory, point.id, location)?;
        }

        for (id, base) in &bases {
            if registry.nodes.contains_key(id) {
                for item in &base.items {
                    registry.place_item(*id, *item)?;
                }
            }
        }

        for row in &data.manual_positions {
            let position = PositionOverride::from_row(row, &registry.world)?;
            let node = match registry.nodes.entry(row.base) {
                Entry::Occupied(node) => node.into_mut(),
                Entry::Vacant(slot) => {
                    let base = bases
                        .get(&row.base)
                        .ok_or(NodeError::PointBaseNotFound(row.base))?;
                    registry.stats.nodes = registry.stats.nodes.saturating_add(1);
                    let node = slot.insert(create_node(base, None, &tables)?);
                    for item in &base.items {
                        if let Some(gatherable) = registry.items.get(*item).cloned() {
                            let outcome = node.add_item(&gatherable, &mut registry.items);
                            record_item(&mut registry.stats, outcome);
                        }
                    }
                    node
                }
            };
            if node.set_position_override(position) {
                registry.stats.manual_positions = registry.stats.manual_positions.saturating_add(1);
            } else {
                debug!(node = %row.base, "Duplicate manual position ignored");
            }
            node.set_place_name_if_missing(row.place_name.clone());
        }

        info!(
            nodes = registry.stats.nodes,
            sightings = registry.stats.sightings,
            items_placed = registry.stats.items_placed,
            items_rejected = registry.stats.items_rejected,
            manual_positions = registry.stats.manual_positions,
            "Gathering nodes assembled"
        );
        Ok(registry)
    }

    /// Add a further sighting to an existing node.
    ///
    /// A sighting in a territory other than the node's is logged and
    /// skipped. Returns whether the node's aggregate changed.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::PointBaseNotFound`] for an unknown node and
    /// [`NodeError::TerritoryNotFound`] for an unknown territory.
    pub fn add_sighting(
        &mut self,
        node: GatheringPointBaseId,
        territory: TerritoryId,
        point: GatheringPointId,
        location: NodeLocation,
    ) -> Result<bool, NodeError> {
        let territory = self
            .world
            .territory(territory)
            .ok_or(NodeError::TerritoryNotFound(territory))?;
        let entry = self
            .nodes
            .get_mut(&node)
            .ok_or(NodeError::PointBaseNotFound(node))?;
        match entry.add_sighting(territory, point, location) {
            Ok(changed) => {
                if changed {
                    self.stats.sightings = self.stats.sightings.saturating_add(1);
                }
                Ok(changed)
            }
            Err(err) => {
                warn!(%node, %point, error = %err, "Skipping sighting");
                self.stats.skipped_sightings = self.stats.skipped_sightings.saturating_add(1);
                Ok(false)
            }
        }
    }

    /// Place an item on an existing node.
    ///
    /// Unknown item ids and full nodes are logged and reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::PointBaseNotFound`] for an unknown node.
    pub fn place_item(
        &mut self,
        node: GatheringPointBaseId,
        item: ItemId,
    ) -> Result<Option<SlotInsertion>, NodeError> {
        let entry = self
            .nodes
            .get_mut(&node)
            .ok_or(NodeError::PointBaseNotFound(node))?;
        let Some(gatherable) = self.items.get(item).cloned() else {
            debug!(%node, %item, "Item id not in item table");
            self.stats.unknown_items = self.stats.unknown_items.saturating_add(1);
            return Ok(None);
        };
        Ok(record_item(
            &mut self.stats,
            entry.add_item(&gatherable, &mut self.items),
        ))
    }

    /// Look up a node.
    pub fn get(&self, id: GatheringPointBaseId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Iterate over all nodes in node order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Item catalogue and item-to-node index.
    pub const fn items(&self) -> &ItemIndex {
        &self.items
    }

    /// Territories and aetherytes.
    pub const fn world(&self) -> &WorldRegistry {
        &self.world
    }

    /// Counters from the build.
    pub const fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Nodes yielding the item with the given English name.
    pub fn nodes_for_item(&self, name: &str) -> Vec<&Node> {
        self.items
            .find_by_name(name)
            .map(|item| {
                self.items
                    .nodes_for(item.id())
                    .filter_map(|id| self.nodes.get(&id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nodes yielding every named item and, if a time is given, up at it.
    pub fn find<S: AsRef<str>>(&self, names: &[S], time: Option<EorzeaTime>) -> Vec<&Node> {
        self.iter()
            .filter(|node| node.has_items(names))
            .filter(|node| time.is_none_or(|time| node.is_up_at(time)))
            .collect()
    }

    /// Export rows for every node in node order.
    pub fn summaries(&self) -> Vec<NodeSummary> {
        self.iter().map(Node::summary).collect()
    }
}

/// Count a slot insertion outcome, logging full nodes.
fn record_item(
    stats: &mut BuildStats,
    outcome: Result<SlotInsertion, NodeError>,
) -> Option<SlotInsertion> {
    match outcome {
        Ok(insertion) => {
            if matches!(insertion, SlotInsertion::Inserted(_)) {
                stats.items_placed = stats.items_placed.saturating_add(1);
            }
            Some(insertion)
        }
        Err(err) => {
            warn!(error = %err, "Item not placed");
            stats.items_rejected = stats.items_rejected.saturating_add(1);
            None
        }
    }
}

/// Create a node from its base row and optional timing information.
fn create_node(
    base: &GatheringPointBaseRow,
    transient: Option<&GatheringPointTransientRow>,
    tables: &BTreeMap<RarePopTimeTableId, &RarePopTimeTable>,
) -> Result<Node, NodeError> {
    let node_type = transient.map_or(NodeType::Regular, GatheringPointTransientRow::node_type);
    let classifier = NodeClassifier::from_row(base, node_type)?;
    let times = match (node_type, transient) {
        (NodeType::Unspoiled, Some(transient)) => match transient.rare_pop_time_table {
            Some(id) => tables
                .get(&id)
                .map(|&table| TimeWindowSet::from_rare_pop_table(table))
                .ok_or(NodeError::RarePopTableNotFound(id))?,
            None => TimeWindowSet::default(),
        },
        (NodeType::Ephemeral, Some(transient)) => {
            TimeWindowSet::from_ephemeral(transient.ephemeral_start, transient.ephemeral_end)
        }
        _ => TimeWindowSet::default(),
    };
    debug!(node = %base.id, ?node_type, "Created node");
    Ok(Node::new(classifier).with_times(times))
}

#[cfg(test)]
mod tests {
    use gathering_types::{
        GatheringPointRow, ItemRow, MapPosition, RarePopTimeSlot, SightingRow, TerritoryRow,
    };

    use super::*;

    fn base(id: u32, items: &[u32]) -> GatheringPointBaseRow {
        GatheringPointBaseRow {
            id: GatheringPointBaseId::new(id),
            gathering_type: 2,
            level: 20,
            items: items.iter().copied().map(ItemId::new).collect(),
        }
    }

    fn point(
        id: u32,
        base: u32,
        transient: Option<GatheringPointTransientRow>,
    ) -> GatheringPointRow {
        GatheringPointRow {
            id: GatheringPointId::new(id),
            base: GatheringPointBaseId::new(base),
            territory: TerritoryId::new(1),
            place_name: None,
            transient,
        }
    }

    fn data() -> GatheringData {
        GatheringData {
            territories: vec![TerritoryRow {
                id: TerritoryId::new(1),
                name: "Central Shroud".to_owned(),
            }],
            items: (1..=3)
                .map(|n| ItemRow {
                    id: ItemId::new(n),
                    names: [(gathering_types::ClientLanguage::English, format!("Log {n}"))]
                        .into_iter()
                        .collect(),
                })
                .collect(),
            point_bases: vec![base(1, &[1, 2]), base(2, &[3, 99])],
            points: vec![point(10, 1, None), point(11, 1, None), point(20, 2, None)],
            sightings: vec![
                SightingRow {
                    point: GatheringPointId::new(10),
                    positions: vec![MapPosition::new(1000, 1000)],
                },
                SightingRow {
                    point: GatheringPointId::new(11),
                    positions: vec![MapPosition::new(2000, 3000)],
                },
            ],
            ..GatheringData::default()
        }
    }

    #[test]
    fn points_of_one_base_merge_into_one_node() {
        let registry = NodeRegistry::build(&data()).unwrap_or_default();
        assert_eq!(registry.len(), 2);
        let node = registry.get(GatheringPointBaseId::new(1));
        let locations = node.and_then(Node::locations);
        assert_eq!(locations.map(|l| l.sightings().len()), Some(2));
        assert_eq!(locations.map(|l| (l.average_x(), l.average_y())), Some((1500, 2000)));
    }

    #[test]
    fn items_are_indexed_and_unknown_ids_counted() {
        let registry = NodeRegistry::build(&data()).unwrap_or_default();
        let stats = registry.stats();
        assert_eq!(stats.items_placed, 3);
        assert_eq!(stats.unknown_items, 1);
        let ids: Vec<_> = registry.nodes_for_item("Log 3").iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![GatheringPointBaseId::new(2)]);
        assert!(registry.nodes_for_item("Nothing").is_empty());
    }

    #[test]
    fn missing_base_aborts_build() {
        let mut broken = data();
        broken.points.push(point(30, 77, None));
        assert_eq!(
            NodeRegistry::build(&broken).err(),
            Some(NodeError::PointBaseNotFound(GatheringPointBaseId::new(77)))
        );
    }

    #[test]
    fn transient_rows_set_variant_and_uptime() {
        let mut source = data();
        source.point_bases.push(base(3, &[]));
        source.point_bases.push(base(4, &[]));
        source.rare_pop_tables.push(RarePopTimeTable {
            id: RarePopTimeTableId::new(5),
            slots: vec![RarePopTimeSlot {
                start_time: 800,
                duration: 160,
            }],
        });
        source.points.push(point(
            30,
            3,
            Some(GatheringPointTransientRow {
                ephemeral_start: 0,
                ephemeral_end: 0,
                rare_pop_time_table: Some(RarePopTimeTableId::new(5)),
            }),
        ));
        source.points.push(point(
            40,
            4,
            Some(GatheringPointTransientRow {
                ephemeral_start: 2200,
                ephemeral_end: 200,
                rare_pop_time_table: None,
            }),
        ));
        let registry = NodeRegistry::build(&source).unwrap_or_default();

        let unspoiled = registry.get(GatheringPointBaseId::new(3));
        assert_eq!(
            unspoiled.map(|n| n.classifier().node_type()),
            Some(NodeType::Unspoiled)
        );
        assert_eq!(
            unspoiled.map(|n| n.times().render_human()),
            Some("08:00 - 10:00 ET".to_owned())
        );

        let ephemeral = registry.get(GatheringPointBaseId::new(4));
        assert_eq!(
            ephemeral.map(|n| n.classifier().node_type()),
            Some(NodeType::Ephemeral)
        );
        assert_eq!(ephemeral.map(|n| n.times().is_up(23)), Some(true));

        let up_at_nine = registry.find::<&str>(&[], Some(EorzeaTime::from_hour_minute(9, 0)));
        let ids: Vec<_> = up_at_nine.iter().map(|n| n.id().into_inner()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn missing_rare_pop_table_aborts_build() {
        let mut source = data();
        source.point_bases.push(base(3, &[]));
        source.points.push(point(
            30,
            3,
            Some(GatheringPointTransientRow {
                ephemeral_start: 0,
                ephemeral_end: 0,
                rare_pop_time_table: Some(RarePopTimeTableId::new(404)),
            }),
        ));
        assert_eq!(
            NodeRegistry::build(&source).err(),
            Some(NodeError::RarePopTableNotFound(RarePopTimeTableId::new(404)))
        );
    }

    #[test]
    fn place_item_on_unknown_node_errors() {
        let mut registry = NodeRegistry::build(&data()).unwrap_or_default();
        assert_eq!(
            registry.place_item(GatheringPointBaseId::new(500), ItemId::new(1)),
            Err(NodeError::PointBaseNotFound(GatheringPointBaseId::new(500)))
        );
        assert_eq!(
            registry.place_item(GatheringPointBaseId::new(1), ItemId::new(1)),
            Ok(Some(SlotInsertion::AlreadyPresent(0)))
        );
    }
}
