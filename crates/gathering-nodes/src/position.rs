//! Manually maintained node positions.

use std::sync::Arc;

use gathering_types::ManualPositionRow;

use crate::error::NodeError;
use crate::territory::{Aetheryte, WorldRegistry};

/// A manual coordinate and anchor for a node.
///
/// Coordinates are centi-units. With `prefer` set the override always wins
/// over aggregated sightings; otherwise it only fills in for missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionOverride {
    /// Closest aetheryte, if known.
    pub anchor: Option<Arc<Aetheryte>>,
    /// Horizontal coordinate.
    pub x_coord: i32,
    /// Vertical coordinate.
    pub y_coord: i32,
    /// Whether this position wins over aggregated data.
    pub prefer: bool,
}

impl PositionOverride {
    /// Create an override without an anchor.
    pub const fn new(x_coord: i32, y_coord: i32, prefer: bool) -> Self {
        Self {
            anchor: None,
            x_coord,
            y_coord,
            prefer,
        }
    }

    /// Attach an anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Arc<Aetheryte>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Resolve a manual position row against the world registry.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::AetheryteNotFound`] if the row names an
    /// aetheryte the registry does not know.
    pub fn from_row(row: &ManualPositionRow, world: &WorldRegistry) -> Result<Self, NodeError> {
        let anchor = row
            .aetheryte
            .map(|id| {
                world
                    .aetheryte(id)
                    .map(Arc::clone)
                    .ok_or(NodeError::AetheryteNotFound(id))
            })
            .transpose()?;
        Ok(Self {
            anchor,
            x_coord: row.position.x,
            y_coord: row.position.y,
            prefer: row.prefer,
        })
    }
}
