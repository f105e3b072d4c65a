//! Type-safe identifier wrappers around raw game-table row numbers.
//!
//! Every table the gathering data is extracted from keys its rows by an
//! unsigned integer. Wrapping each key in its own newtype prevents a
//! gathering point id from being looked up in the item table by accident.
//! The row numbers are stable across the whole data set, so these ids are
//! also the ordering keys used by the node registry.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around a `u32` row number with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
            Deserialize, TS,
        )]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl $name {
            /// Wrap a raw row number.
            pub const fn new(row: u32) -> Self {
                Self(row)
            }

            /// Return the raw row number.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(row: u32) -> Self {
                Self(row)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Row of the gathering point base table: one logical gathering node.
    ///
    /// This is the source-table identifier that orders nodes.
    GatheringPointBaseId
}

define_id! {
    /// Row of the gathering point table: one raw in-world sighting of a node.
    GatheringPointId
}

define_id! {
    /// Row of the gathering item table.
    ItemId
}

define_id! {
    /// Row of the aetheryte table (a fast-travel anchor).
    AetheryteId
}

define_id! {
    /// Row of the territory table (a zone containing nodes and anchors).
    TerritoryId
}

define_id! {
    /// Row of the rare pop time table used by unspoiled nodes.
    RarePopTimeTableId
}
