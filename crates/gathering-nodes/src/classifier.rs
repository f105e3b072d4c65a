//! Immutable classification of a node.

use std::cmp::Ordering;

use gathering_types::{GatheringPointBaseId, GatheringPointBaseRow, GatheringType, NodeType};

use crate::error::NodeError;

/// What kind of node this is and where it comes from.
///
/// Classifiers are ordered and compared by their source-table identifier
/// only; two classifiers with the same id are considered equal.
#[derive(Debug, Clone, Copy)]
pub struct NodeClassifier {
    /// Gathering action the node requires.
    gathering_type: GatheringType,
    /// Spawn behaviour.
    node_type: NodeType,
    /// Source-table identifier.
    point_base_id: GatheringPointBaseId,
    /// Required gathering level.
    level: u16,
}

impl NodeClassifier {
    /// Create a classifier from already decoded parts.
    ///
    /// A level of zero is raised to 1.
    pub fn new(
        point_base_id: GatheringPointBaseId,
        gathering_type: GatheringType,
        node_type: NodeType,
        level: u16,
    ) -> Self {
        Self {
            gathering_type,
            node_type,
            point_base_id,
            level: level.max(1),
        }
    }

    /// Classify a base row with an explicit node variant.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::UnknownGatheringType`] if the row's gathering
    /// type code is not recognised.
    pub fn from_row(row: &GatheringPointBaseRow, node_type: NodeType) -> Result<Self, NodeError> {
        let gathering_type = GatheringType::from_code(row.gathering_type)
            .ok_or(NodeError::UnknownGatheringType(row.gathering_type))?;
        Ok(Self::new(row.id, gathering_type, node_type, row.level))
    }

    /// Return the gathering type.
    pub const fn gathering_type(&self) -> GatheringType {
        self.gathering_type
    }

    /// Return the node variant.
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Return the source-table identifier.
    pub const fn point_base_id(&self) -> GatheringPointBaseId {
        self.point_base_id
    }

    /// Return the required level (at least 1).
    pub const fn level(&self) -> u16 {
        self.level
    }

    /// Mining or quarrying node.
    pub const fn is_mining_family(&self) -> bool {
        self.gathering_type.is_mining_family()
    }

    /// Logging or harvesting node.
    pub const fn is_gathering_family(&self) -> bool {
        self.gathering_type.is_gathering_family()
    }

    /// Compare against an optional target; a missing target orders first.
    pub fn compare_to(&self, other: Option<&Self>) -> Ordering {
        other.map_or(Ordering::Greater, |other| self.cmp(other))
    }
}

impl PartialEq for NodeClassifier {
    fn eq(&self, other: &Self) -> bool {
        self.point_base_id == other.point_base_id
    }
}

impl Eq for NodeClassifier {}

impl PartialOrd for NodeClassifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeClassifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point_base_id.cmp(&other.point_base_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u32, gathering_type: u8) -> GatheringPointBaseRow {
        GatheringPointBaseRow {
            id: GatheringPointBaseId::new(id),
            gathering_type,
            level: 50,
            items: Vec::new(),
        }
    }

    fn classify(id: u32, gathering_type: u8) -> Option<NodeClassifier> {
        NodeClassifier::from_row(&row(id, gathering_type), NodeType::Regular).ok()
    }

    #[test]
    fn orders_by_source_id() {
        let low = classify(10, 0);
        let high = classify(20, 3);
        assert!(low.is_some() && high.is_some());
        if let (Some(low), Some(high)) = (low, high) {
            assert!(low < high);
            assert_eq!(low.compare_to(Some(&high)), Ordering::Less);
            assert_eq!(high.compare_to(Some(&low)), Ordering::Greater);
        }
    }

    #[test]
    fn missing_target_compares_greater() {
        let meta = classify(10, 0);
        assert_eq!(meta.map(|m| m.compare_to(None)), Some(Ordering::Greater));
    }

    #[test]
    fn equality_ignores_everything_but_id() {
        let a = NodeClassifier::from_row(&row(7, 0), NodeType::Regular).ok();
        let b = NodeClassifier::from_row(&row(7, 2), NodeType::Unspoiled).ok();
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn family_predicates() {
        let mining = classify(1, 0);
        let logging = classify(2, 2);
        let fishing = classify(3, 4);
        assert_eq!(mining.map(|m| m.is_mining_family()), Some(true));
        assert_eq!(mining.map(|m| m.is_gathering_family()), Some(false));
        assert_eq!(logging.map(|m| m.is_gathering_family()), Some(true));
        assert_eq!(fishing.map(|m| m.is_mining_family() || m.is_gathering_family()), Some(false));
    }

    #[test]
    fn unknown_gathering_type_is_rejected() {
        let result = NodeClassifier::from_row(&row(1, 9), NodeType::Regular);
        assert_eq!(result.err(), Some(NodeError::UnknownGatheringType(9)));
    }

    #[test]
    fn level_is_at_least_one() {
        let mut source = row(1, 1);
        source.level = 0;
        let meta = NodeClassifier::from_row(&source, NodeType::Ephemeral).ok();
        assert_eq!(meta.map(|m| m.level()), Some(1));
        assert_eq!(meta.map(|m| m.node_type()), Some(NodeType::Ephemeral));
    }
}
