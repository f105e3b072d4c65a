//! The canonical gathering node and its coordinate/anchor resolution.
//!
//! A [`Node`] may carry both a manual [`PositionOverride`] and a
//! [`LocationAggregate`] built from sightings. Which one is authoritative
//! is decided by two pure functions, [`resolve_axis`] and
//! [`resolve_anchor`]:
//!
//! | override | prefer | aggregate          | result                     |
//! |----------|--------|--------------------|----------------------------|
//! | none     | -      | none               | `0`                        |
//! | none     | -      | present            | aggregate average          |
//! | present  | yes    | any                | override / 100             |
//! | present  | no     | none               | override / 100             |
//! | present  | no     | average `== 0`     | override / 100             |
//! | present  | no     | average `!= 0`     | aggregate average / 100    |
//!
//! An aggregate average of exactly zero is read as "not computed yet", so
//! a node legitimately sitting on the zero axis falls back to its override.

use std::cmp::Ordering;
use std::sync::Arc;

use gathering_types::{GatheringPointBaseId, GatheringPointId, NodeSummary};

use crate::aggregate::{LocationAggregate, NodeLocation};
use crate::classifier::NodeClassifier;
use crate::eorzea::EorzeaTime;
use crate::error::NodeError;
use crate::items::{Gatherable, ItemIndex, ItemSlotSet, SlotInsertion};
use crate::position::PositionOverride;
use crate::territory::{Aetheryte, Territory};
use crate::times::TimeWindowSet;

/// Divisor from centi-units to map coordinates.
const COORDINATE_SCALE: f64 = 100.0;

/// Map axis selector for [`resolve_axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// Resolve one coordinate of a node from its override and aggregate.
///
/// See the module documentation for the precedence table. The branch
/// without an override returns the aggregate average unscaled.
pub fn resolve_axis(
    position: Option<&PositionOverride>,
    aggregate: Option<&LocationAggregate>,
    axis: Axis,
) -> f64 {
    let aggregated = aggregate.map(|aggregate| match axis {
        Axis::X => aggregate.average_x(),
        Axis::Y => aggregate.average_y(),
    });

    let Some(position) = position else {
        return aggregated.map_or(0.0, f64::from);
    };

    let manual = match axis {
        Axis::X => position.x_coord,
        Axis::Y => position.y_coord,
    };
    match aggregated {
        Some(value) if !position.prefer && value != 0 => f64::from(value) / COORDINATE_SCALE,
        _ => f64::from(manual) / COORDINATE_SCALE,
    }
}

/// Resolve the authoritative anchor of a node.
///
/// The override's anchor wins when it is preferred or when the aggregate
/// has no anchor; otherwise the aggregate's closest anchor is used.
pub fn resolve_anchor<'a>(
    position: Option<&'a PositionOverride>,
    aggregate: Option<&'a LocationAggregate>,
) -> Option<&'a Arc<Aetheryte>> {
    let aggregated = aggregate.and_then(LocationAggregate::closest_anchor);
    match position {
        Some(position) if position.prefer || aggregated.is_none() => position.anchor.as_ref(),
        _ => aggregated,
    }
}

/// A canonical, de-duplicated gathering location.
#[derive(Debug, Clone)]
pub struct Node {
    /// Classification and ordering key.
    classifier: NodeClassifier,
    /// Hourly uptime.
    times: TimeWindowSet,
    /// Yieldable items.
    items: ItemSlotSet,
    /// Manual position, if any.
    position: Option<PositionOverride>,
    /// Aggregated sightings, if any.
    locations: Option<LocationAggregate>,
    /// Fallback place name.
    place_name: Option<String>,
}

impl Node {
    /// Create a node that is always up, has no items and no position.
    pub fn new(classifier: NodeClassifier) -> Self {
        Self {
            classifier,
            times: TimeWindowSet::default(),
            items: ItemSlotSet::new(),
            position: None,
            locations: None,
            place_name: None,
        }
    }

    /// Set the uptime.
    #[must_use]
    pub const fn with_times(mut self, times: TimeWindowSet) -> Self {
        self.times = times;
        self
    }

    /// Set the manual position.
    #[must_use]
    pub fn with_position_override(mut self, position: PositionOverride) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the fallback place name.
    #[must_use]
    pub fn with_place_name(mut self, place_name: impl Into<String>) -> Self {
        self.place_name = Some(place_name.into());
        self
    }

    /// Install a manual position if none is set yet.
    ///
    /// Returns `false` and keeps the existing override otherwise.
    pub fn set_position_override(&mut self, position: PositionOverride) -> bool {
        if self.position.is_some() {
            return false;
        }
        self.position = Some(position);
        true
    }

    /// Set the fallback place name if none is set yet.
    pub fn set_place_name_if_missing(&mut self, place_name: Option<String>) {
        if self.place_name.is_none() {
            self.place_name = place_name;
        }
    }

    /// Record a sighting of this node in `territory`.
    ///
    /// The first sighting fixes the node's territory. Returns whether the
    /// aggregate changed.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::TerritoryMismatch`] if the sighting lies in a
    /// different territory than earlier ones.
    pub fn add_sighting(
        &mut self,
        territory: &Arc<Territory>,
        id: GatheringPointId,
        location: NodeLocation,
    ) -> Result<bool, NodeError> {
        let node = self.id();
        let aggregate = self
            .locations
            .get_or_insert_with(|| LocationAggregate::new(Arc::clone(territory)));
        let expected = aggregate.territory().id;
        if expected != territory.id {
            return Err(NodeError::TerritoryMismatch {
                node,
                expected,
                found: territory.id,
            });
        }
        Ok(aggregate.add_sighting(id, location))
    }

    /// Place an item in the first free slot.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::SlotsFull`] naming this node and the item if all
    /// slots are used. The node is unchanged in that case.
    pub fn add_item(
        &mut self,
        item: &Arc<Gatherable>,
        index: &mut ItemIndex,
    ) -> Result<SlotInsertion, NodeError> {
        self.items
            .insert_if_absent_slot(self.classifier.point_base_id(), item, index)
    }

    /// Source-table identifier.
    pub const fn id(&self) -> GatheringPointBaseId {
        self.classifier.point_base_id()
    }

    /// Classification.
    pub const fn classifier(&self) -> &NodeClassifier {
        &self.classifier
    }

    /// Uptime.
    pub const fn times(&self) -> &TimeWindowSet {
        &self.times
    }

    /// Item slots.
    pub const fn items(&self) -> &ItemSlotSet {
        &self.items
    }

    /// Manual position.
    pub const fn position_override(&self) -> Option<&PositionOverride> {
        self.position.as_ref()
    }

    /// Aggregated sightings.
    pub const fn locations(&self) -> Option<&LocationAggregate> {
        self.locations.as_ref()
    }

    /// Whether every named item is yielded by this node.
    pub fn has_items<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.items.has_items(names)
    }

    /// Whether the node is up at the given Eorzea time.
    pub fn is_up_at(&self, time: EorzeaTime) -> bool {
        self.times.is_up_at(time)
    }

    /// Resolved horizontal coordinate.
    pub fn x(&self) -> f64 {
        resolve_axis(self.position.as_ref(), self.locations.as_ref(), Axis::X)
    }

    /// Resolved vertical coordinate.
    pub fn y(&self) -> f64 {
        resolve_axis(self.position.as_ref(), self.locations.as_ref(), Axis::Y)
    }

    /// Authoritative anchor, following the coordinate precedence.
    pub fn valid_anchor(&self) -> Option<&Arc<Aetheryte>> {
        resolve_anchor(self.position.as_ref(), self.locations.as_ref())
    }

    /// Authoritative anchor, falling back to the first aetheryte of the
    /// node's territory.
    pub fn closest_anchor(&self) -> Option<&Arc<Aetheryte>> {
        self.valid_anchor().or_else(|| {
            self.locations
                .as_ref()
                .and_then(|locations| locations.territory().first_aetheryte())
        })
    }

    /// Place name of the sightings, else the fallback place name.
    pub fn place_name(&self) -> Option<&str> {
        self.locations
            .as_ref()
            .and_then(LocationAggregate::place_name)
            .or(self.place_name.as_deref())
    }

    /// Compare against an optional target; a missing target orders first.
    pub fn compare_to(&self, other: Option<&Self>) -> Ordering {
        self.classifier
            .compare_to(other.map(|other| &other.classifier))
    }

    /// Flatten into an export row.
    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            id: self.id(),
            gathering_type: self.classifier.gathering_type(),
            node_type: self.classifier.node_type(),
            level: self.classifier.level(),
            items: self.items.render(),
            uptime: self.times.uptime_table(),
            hours: self.times.render_human(),
            always_up: self.times.is_always_up(),
            x: self.x(),
            y: self.y(),
            aetheryte: self.closest_anchor().map(|anchor| anchor.name.clone()),
            place_name: self.place_name().map(str::to_owned),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.classifier == other.classifier
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.classifier.cmp(&other.classifier)
    }
}
