//! Enumeration types for gathering nodes.
//!
//! The game tables store the gathering type as a small integer code. It is
//! decoded once into the closed [`GatheringType`] enumeration so that family
//! membership is an explicit match instead of a bit test on the raw code.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Gathering types
// ---------------------------------------------------------------------------

/// The gathering action a node requires.
///
/// Discriminants match the raw codes of the gathering type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[repr(u8)]
#[ts(export, export_to = "bindings/")]
pub enum GatheringType {
    /// Mineral deposits (miner).
    Mining = 0,
    /// Rocky outcrops (miner).
    Quarrying = 1,
    /// Mature trees (botanist).
    Logging = 2,
    /// Lush vegetation patches (botanist).
    Harvesting = 3,
    /// Spearfishing holes (fisher).
    Spearfishing = 4,
}

impl GatheringType {
    /// Every gathering type in code order.
    pub const ALL: [Self; 5] = [
        Self::Mining,
        Self::Quarrying,
        Self::Logging,
        Self::Harvesting,
        Self::Spearfishing,
    ];

    /// Decode a raw gathering type code from the source table.
    ///
    /// Returns `None` for codes outside the known range.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Mining),
            1 => Some(Self::Quarrying),
            2 => Some(Self::Logging),
            3 => Some(Self::Harvesting),
            4 => Some(Self::Spearfishing),
            _ => None,
        }
    }

    /// Return the raw source-table code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this type belongs to the mining family.
    ///
    /// Equivalent to `(code & 1) == code` on the raw codes: Mining and
    /// Quarrying.
    pub const fn is_mining_family(self) -> bool {
        matches!(self, Self::Mining | Self::Quarrying)
    }

    /// Whether this type belongs to the botany family.
    ///
    /// Equivalent to `(code & 0b10) == 0b10` on the raw codes: Logging and
    /// Harvesting. Spearfishing belongs to neither family.
    pub const fn is_gathering_family(self) -> bool {
        matches!(self, Self::Logging | Self::Harvesting)
    }
}

// ---------------------------------------------------------------------------
// Node variants
// ---------------------------------------------------------------------------

/// Spawn behaviour of a node.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum NodeType {
    /// Always present.
    #[default]
    Regular,
    /// Rare node that spawns on a fixed timetable.
    Unspoiled,
    /// Short-lived node bound to an Eorzea time window.
    Ephemeral,
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

/// Client language an item name is localized in.
///
/// Name matching in searches always uses [`ClientLanguage::English`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ClientLanguage {
    /// English.
    #[default]
    English,
    /// German.
    German,
    /// French.
    French,
    /// Japanese.
    Japanese,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for kind in GatheringType::ALL {
            assert_eq!(GatheringType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(GatheringType::from_code(5), None);
    }

    #[test]
    fn family_predicates_match_raw_bit_tests() {
        for kind in GatheringType::ALL {
            let code = kind.code();
            assert_eq!(kind.is_mining_family(), (code & 1) == code, "{kind:?}");
            assert_eq!(kind.is_gathering_family(), (code & 0b10) == 0b10, "{kind:?}");
        }
    }

    #[test]
    fn spearfishing_is_in_no_family() {
        assert!(!GatheringType::Spearfishing.is_mining_family());
        assert!(!GatheringType::Spearfishing.is_gathering_family());
    }

    #[test]
    fn language_serializes_lowercase() {
        let json = serde_json::to_string(&ClientLanguage::German).ok();
        assert_eq!(json.as_deref(), Some("\"german\""));
    }
}
