//! Merging raw sightings of one logical node into a stable position.
//!
//! Each gathering point that belongs to a node contributes one
//! [`NodeLocation`] record. The [`LocationAggregate`] keeps the running
//! average of all records and the aetheryte closest to that average. Both
//! derived values are recomputed synchronously on every effective
//! insertion, so they are never stale.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use gathering_types::{GatheringPointId, MapPosition, SightingRow};

use crate::territory::{Aetheryte, Territory};

/// Integer mean of a set of positions, truncating toward zero.
///
/// Returns `None` for an empty input.
fn mean_position(positions: impl IntoIterator<Item = MapPosition>) -> Option<MapPosition> {
    let (sum_x, sum_y, count) = positions.into_iter().fold(
        (0_i64, 0_i64, 0_i64),
        |(sx, sy, n), pos| {
            (
                sx.saturating_add(i64::from(pos.x)),
                sy.saturating_add(i64::from(pos.y)),
                n.saturating_add(1),
            )
        },
    );
    let x = sum_x.checked_div(count)?;
    let y = sum_y.checked_div(count)?;
    Some(MapPosition::new(
        i32::try_from(x).ok()?,
        i32::try_from(y).ok()?,
    ))
}

/// Observed spawn copies of a single gathering point.
///
/// A record without positions carries no location data and is ignored by
/// the aggregate average.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLocation {
    /// Distinct observed spawn positions.
    positions: BTreeSet<MapPosition>,
    /// English place name of the area, if known.
    place_name: Option<String>,
    /// Cached mean of `positions`.
    average: Option<MapPosition>,
}

impl NodeLocation {
    /// Create a record from observed positions.
    pub fn new(positions: impl IntoIterator<Item = MapPosition>) -> Self {
        let positions: BTreeSet<MapPosition> = positions.into_iter().collect();
        let average = mean_position(positions.iter().copied());
        Self {
            positions,
            place_name: None,
            average,
        }
    }

    /// Create a record from a sighting row.
    pub fn from_row(row: &SightingRow) -> Self {
        Self::new(row.positions.iter().copied())
    }

    /// Attach a place name.
    #[must_use]
    pub fn with_place_name(mut self, place_name: Option<String>) -> Self {
        self.place_name = place_name;
        self
    }

    /// Mean position of this record, `None` if it has no positions.
    pub const fn average(&self) -> Option<MapPosition> {
        self.average
    }

    /// Place name of this record.
    pub fn place_name(&self) -> Option<&str> {
        self.place_name.as_deref()
    }

    /// Observed positions.
    pub const fn positions(&self) -> &BTreeSet<MapPosition> {
        &self.positions
    }

    /// Whether the record carries no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Merge another observation of the same gathering point.
    ///
    /// Returns `true` if new positions or a missing place name were added.
    pub fn absorb(&mut self, other: &Self) -> bool {
        let before = self.positions.len();
        self.positions.extend(other.positions.iter().copied());
        let mut changed = self.positions.len() != before;
        if changed {
            self.average = mean_position(self.positions.iter().copied());
        }
        if self.place_name.is_none() && other.place_name.is_some() {
            self.place_name.clone_from(&other.place_name);
            changed = true;
        }
        changed
    }
}

/// All sightings of one logical node within its territory.
#[derive(Debug, Clone)]
pub struct LocationAggregate {
    /// Territory the node belongs to.
    territory: Arc<Territory>,
    /// Aetheryte closest to the current average.
    closest_anchor: Option<Arc<Aetheryte>>,
    /// Sighting records keyed by gathering point.
    sightings: BTreeMap<GatheringPointId, NodeLocation>,
    /// Average horizontal coordinate; zero until data arrives.
    average_x: i32,
    /// Average vertical coordinate; zero until data arrives.
    average_y: i32,
}

impl LocationAggregate {
    /// Create an empty aggregate in `territory`.
    pub const fn new(territory: Arc<Territory>) -> Self {
        Self {
            territory,
            closest_anchor: None,
            sightings: BTreeMap::new(),
            average_x: 0,
            average_y: 0,
        }
    }

    /// Record a sighting.
    ///
    /// A new `id` is inserted. A known `id` absorbs the location into its
    /// existing record. Derived values are recomputed only when something
    /// changed; returns whether it did.
    pub fn add_sighting(&mut self, id: GatheringPointId, location: NodeLocation) -> bool {
        let changed = if let Some(existing) = self.sightings.get_mut(&id) {
            existing.absorb(&location)
        } else {
            self.sightings.insert(id, location);
            true
        };
        if changed {
            self.recompute();
        }
        changed
    }

    /// Recompute the average position and the closest anchor.
    fn recompute(&mut self) {
        let average = mean_position(self.sightings.values().filter_map(NodeLocation::average));
        let position = average.unwrap_or_default();
        self.average_x = position.x;
        self.average_y = position.y;
        // Without any observed position there is nothing to measure from.
        self.closest_anchor = average.and_then(|average| {
            self.territory
                .closest_aetheryte(average.x, average.y)
                .map(Arc::clone)
        });
    }

    /// Average horizontal coordinate in centi-units.
    pub const fn average_x(&self) -> i32 {
        self.average_x
    }

    /// Average vertical coordinate in centi-units.
    pub const fn average_y(&self) -> i32 {
        self.average_y
    }

    /// Aetheryte closest to the average, if the territory has any.
    pub const fn closest_anchor(&self) -> Option<&Arc<Aetheryte>> {
        self.closest_anchor.as_ref()
    }

    /// Owning territory.
    pub const fn territory(&self) -> &Arc<Territory> {
        &self.territory
    }

    /// Sighting records keyed by gathering point.
    pub const fn sightings(&self) -> &BTreeMap<GatheringPointId, NodeLocation> {
        &self.sightings
    }

    /// First place name among the sightings, in gathering point order.
    pub fn place_name(&self) -> Option<&str> {
        self.sightings.values().find_map(NodeLocation::place_name)
    }
}
