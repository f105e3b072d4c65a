//! Territories and their aetherytes (fast-travel anchors).
//!
//! The [`WorldRegistry`] owns every territory and aetheryte. Nodes only hold
//! shared, read-only handles to them; nothing in this crate mutates a
//! territory once the registry is built.

use std::collections::BTreeMap;
use std::sync::Arc;

use gathering_types::{AetheryteId, GatheringData, MapPosition, TerritoryId};

use crate::error::NodeError;

/// A fast-travel anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aetheryte {
    /// Source-table identifier.
    pub id: AetheryteId,
    /// English name.
    pub name: String,
    /// Territory the aetheryte stands in.
    pub territory: TerritoryId,
    /// Map position in centi-units.
    pub position: MapPosition,
}

impl Aetheryte {
    /// Squared map distance from this aetheryte to `(x, y)` in `territory`.
    ///
    /// Aetherytes in another territory are unreachable and report
    /// `u64::MAX`.
    pub fn world_distance(&self, territory: TerritoryId, x: i32, y: i32) -> u64 {
        if territory != self.territory {
            return u64::MAX;
        }
        let dx = u64::from(x.abs_diff(self.position.x));
        let dy = u64::from(y.abs_diff(self.position.y));
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

/// A zone containing nodes and aetherytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    /// Source-table identifier.
    pub id: TerritoryId,
    /// English name.
    pub name: String,
    /// Aetherytes in this territory, in source order.
    pub aetherytes: Vec<Arc<Aetheryte>>,
}

impl Territory {
    /// Create a territory without aetherytes.
    pub fn new(id: TerritoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            aetherytes: Vec::new(),
        }
    }

    /// The aetheryte closest to `(x, y)`; the earliest wins ties.
    ///
    /// Returns `None` if the territory has no aetherytes.
    pub fn closest_aetheryte(&self, x: i32, y: i32) -> Option<&Arc<Aetheryte>> {
        self.aetherytes
            .iter()
            .min_by_key(|aetheryte| aetheryte.world_distance(self.id, x, y))
    }

    /// The first aetheryte in source order.
    pub fn first_aetheryte(&self) -> Option<&Arc<Aetheryte>> {
        self.aetherytes.first()
    }
}

/// Owner of every territory and aetheryte.
#[derive(Debug, Clone, Default)]
pub struct WorldRegistry {
    /// Territories by id.
    territories: BTreeMap<TerritoryId, Arc<Territory>>,
    /// Aetherytes by id.
    aetherytes: BTreeMap<AetheryteId, Arc<Aetheryte>>,
}

impl WorldRegistry {
    /// Build the registry from the territory and aetheryte tables.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::DuplicateTerritory`] or
    /// [`NodeError::DuplicateAetheryte`] on repeated ids, and
    /// [`NodeError::TerritoryNotFound`] if an aetheryte references an unknown
    /// territory.
    pub fn from_data(data: &GatheringData) -> Result<Self, NodeError> {
        let mut territories: BTreeMap<TerritoryId, Territory> = BTreeMap::new();
        for row in &data.territories {
            if territories.contains_key(&row.id) {
                return Err(NodeError::DuplicateTerritory(row.id));
            }
            territories.insert(row.id, Territory::new(row.id, row.name.clone()));
        }

        let mut aetherytes = BTreeMap::new();
        for row in &data.aetherytes {
            if aetherytes.contains_key(&row.id) {
                return Err(NodeError::DuplicateAetheryte(row.id));
            }
            let territory = territories
                .get_mut(&row.territory)
                .ok_or(NodeError::TerritoryNotFound(row.territory))?;
            let aetheryte = Arc::new(Aetheryte {
                id: row.id,
                name: row.name.clone(),
                territory: row.territory,
                position: row.position,
            });
            territory.aetherytes.push(Arc::clone(&aetheryte));
            aetherytes.insert(row.id, aetheryte);
        }

        Ok(Self {
            territories: territories
                .into_iter()
                .map(|(id, territory)| (id, Arc::new(territory)))
                .collect(),
            aetherytes,
        })
    }

    /// Look up a territory.
    pub fn territory(&self, id: TerritoryId) -> Option<&Arc<Territory>> {
        self.territories.get(&id)
    }

    /// Look up an aetheryte.
    pub fn aetheryte(&self, id: AetheryteId) -> Option<&Arc<Aetheryte>> {
        self.aetherytes.get(&id)
    }

    /// Number of territories.
    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    /// Number of aetherytes.
    pub fn aetheryte_count(&self) -> usize {
        self.aetherytes.len()
    }
}

#[cfg(test)]
mod tests {
    use gathering_types::{AetheryteRow, TerritoryRow};

    use super::*;

    fn data() -> GatheringData {
        GatheringData {
            territories: vec![
                TerritoryRow {
                    id: TerritoryId::new(1),
                    name: "Coerthas".to_owned(),
                },
                TerritoryRow {
                    id: TerritoryId::new(2),
                    name: "Mor Dhona".to_owned(),
                },
            ],
            aetherytes: vec![
                AetheryteRow {
                    id: AetheryteId::new(10),
                    name: "West".to_owned(),
                    territory: TerritoryId::new(1),
                    position: MapPosition::new(1000, 1000),
                },
                AetheryteRow {
                    id: AetheryteId::new(11),
                    name: "East".to_owned(),
                    territory: TerritoryId::new(1),
                    position: MapPosition::new(3000, 1000),
                },
            ],
            ..GatheringData::default()
        }
    }

    #[test]
    fn registry_groups_aetherytes_by_territory() {
        let world = WorldRegistry::from_data(&data());
        assert!(world.is_ok());
        let world = world.unwrap_or_default();
        assert_eq!(world.territory_count(), 2);
        assert_eq!(world.aetheryte_count(), 2);
        let coerthas = world.territory(TerritoryId::new(1));
        assert_eq!(coerthas.map(|t| t.aetherytes.len()), Some(2));
        let mor_dhona = world.territory(TerritoryId::new(2));
        assert_eq!(mor_dhona.map(|t| t.aetherytes.is_empty()), Some(true));
    }

    #[test]
    fn closest_aetheryte_by_distance() {
        let world = WorldRegistry::from_data(&data()).unwrap_or_default();
        let coerthas = world.territory(TerritoryId::new(1));
        let near_east = coerthas.and_then(|t| t.closest_aetheryte(2900, 1200));
        assert_eq!(near_east.map(|a| a.id), Some(AetheryteId::new(11)));
        let near_west = coerthas.and_then(|t| t.closest_aetheryte(0, 0));
        assert_eq!(near_west.map(|a| a.id), Some(AetheryteId::new(10)));
    }

    #[test]
    fn ties_go_to_first_aetheryte() {
        let world = WorldRegistry::from_data(&data()).unwrap_or_default();
        let midpoint = world
            .territory(TerritoryId::new(1))
            .and_then(|t| t.closest_aetheryte(2000, 1000));
        assert_eq!(midpoint.map(|a| a.id), Some(AetheryteId::new(10)));
    }

    #[test]
    fn empty_territory_has_no_closest() {
        let world = WorldRegistry::from_data(&data()).unwrap_or_default();
        let closest = world
            .territory(TerritoryId::new(2))
            .and_then(|t| t.closest_aetheryte(0, 0));
        assert!(closest.is_none());
    }

    #[test]
    fn other_territory_is_unreachable() {
        let aetheryte = Aetheryte {
            id: AetheryteId::new(1),
            name: "Camp".to_owned(),
            territory: TerritoryId::new(1),
            position: MapPosition::new(0, 0),
        };
        assert_eq!(aetheryte.world_distance(TerritoryId::new(2), 0, 0), u64::MAX);
        assert_eq!(aetheryte.world_distance(TerritoryId::new(1), 3, -4), 25);
    }

    #[test]
    fn unknown_territory_is_rejected() {
        let mut broken = data();
        broken.aetherytes.push(AetheryteRow {
            id: AetheryteId::new(12),
            name: "Lost".to_owned(),
            territory: TerritoryId::new(99),
            position: MapPosition::default(),
        });
        assert_eq!(
            WorldRegistry::from_data(&broken).err(),
            Some(NodeError::TerritoryNotFound(TerritoryId::new(99)))
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut broken = data();
        broken.territories.push(TerritoryRow {
            id: TerritoryId::new(1),
            name: "Again".to_owned(),
        });
        assert_eq!(
            WorldRegistry::from_data(&broken).err(),
            Some(NodeError::DuplicateTerritory(TerritoryId::new(1)))
        );
    }
}
