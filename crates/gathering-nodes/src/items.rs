//! Items a node can yield, and the item-to-node index.
//!
//! Every node owns an [`ItemSlotSet`] of nine slots. Most nodes use far
//! fewer; the slack exists for overlapping hidden items (treasure maps in
//! particular) that several source rows attach to the same node.
//!
//! The reverse direction (which nodes yield an item) lives in the
//! [`ItemIndex`] and is maintained by slot insertion, so the two sides can
//! never drift apart.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use gathering_types::{ClientLanguage, GatheringPointBaseId, ItemId, ItemRow};

use crate::error::NodeError;

/// Number of item slots per node.
pub const ITEM_SLOTS: usize = 9;

/// A gatherable item with its localized names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gatherable {
    /// Source-table identifier.
    id: ItemId,
    /// Display names by client language.
    names: BTreeMap<ClientLanguage, String>,
}

impl Gatherable {
    /// Create an item with an English name only.
    pub fn new(id: ItemId, english_name: impl Into<String>) -> Self {
        let mut names = BTreeMap::new();
        names.insert(ClientLanguage::English, english_name.into());
        Self { id, names }
    }

    /// Create an item from its source row.
    pub fn from_row(row: &ItemRow) -> Self {
        Self {
            id: row.id,
            names: row.names.clone(),
        }
    }

    /// Return the item identifier.
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Return the display name in the given language.
    pub fn name(&self, language: ClientLanguage) -> Option<&str> {
        self.names.get(&language).map(String::as_str)
    }

    /// Return the English display name used for matching.
    pub fn english_name(&self) -> Option<&str> {
        self.name(ClientLanguage::English)
    }
}

impl core::fmt::Display for Gatherable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.english_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Item #{}", self.id),
        }
    }
}

/// Item catalogue plus the item-to-node back-references.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    /// All known items.
    items: BTreeMap<ItemId, Arc<Gatherable>>,
    /// Nodes each item has been placed on.
    nodes_by_item: BTreeMap<ItemId, BTreeSet<GatheringPointBaseId>>,
}

impl ItemIndex {
    /// Create an empty index.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            nodes_by_item: BTreeMap::new(),
        }
    }

    /// Build an index from item rows. Later rows replace earlier ones
    /// with the same id.
    pub fn from_rows(rows: &[ItemRow]) -> Self {
        let mut index = Self::new();
        for row in rows {
            index.insert(Gatherable::from_row(row));
        }
        index
    }

    /// Add an item to the catalogue and return the shared handle.
    pub fn insert(&mut self, item: Gatherable) -> Arc<Gatherable> {
        let item = Arc::new(item);
        self.items.insert(item.id(), Arc::clone(&item));
        item
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&Arc<Gatherable>> {
        self.items.get(&id)
    }

    /// Look up an item by its English name.
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Gatherable>> {
        self.items
            .values()
            .find(|item| item.english_name() == Some(name))
    }

    /// Record that `node` yields `item`. Returns `false` if already known.
    pub fn link(&mut self, item: ItemId, node: GatheringPointBaseId) -> bool {
        self.nodes_by_item.entry(item).or_default().insert(node)
    }

    /// Nodes that yield the given item, in node order.
    pub fn nodes_for(&self, item: ItemId) -> impl Iterator<Item = GatheringPointBaseId> + '_ {
        self.nodes_by_item
            .get(&item)
            .into_iter()
            .flat_map(|nodes| nodes.iter().copied())
    }

    /// Number of catalogued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome of a successful slot insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotInsertion {
    /// The item was placed in this slot.
    Inserted(usize),
    /// The item already occupied this slot; nothing changed.
    AlreadyPresent(usize),
}

impl SlotInsertion {
    /// The slot the item occupies.
    pub const fn slot(self) -> usize {
        match self {
            Self::Inserted(slot) | Self::AlreadyPresent(slot) => slot,
        }
    }
}

/// Fixed-capacity, deduplicating item slots of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSlotSet {
    /// Slots in discovery order; `None` is an unused slot.
    slots: [Option<Arc<Gatherable>>; ITEM_SLOTS],
}

impl ItemSlotSet {
    /// Create an empty slot set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every named item occupies some slot (English names).
    ///
    /// Vacuously true when no names are given.
    pub fn has_items<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|name| {
            self.iter()
                .any(|item| item.english_name() == Some(name.as_ref()))
        })
    }

    /// Place `item` in the first free slot and link it to `node` in the index.
    ///
    /// An item already present keeps its slot and is reported as
    /// [`SlotInsertion::AlreadyPresent`].
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::SlotsFull`] if all slots are occupied. Existing
    /// slots are left untouched.
    pub fn insert_if_absent_slot(
        &mut self,
        node: GatheringPointBaseId,
        item: &Arc<Gatherable>,
        index: &mut ItemIndex,
    ) -> Result<SlotInsertion, NodeError> {
        if let Some(slot) = self.position_of(item.id()) {
            return Ok(SlotInsertion::AlreadyPresent(slot));
        }

        let (slot, free) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())
            .ok_or_else(|| NodeError::SlotsFull {
                node,
                item: item.id(),
                capacity: ITEM_SLOTS,
            })?;

        *free = Some(Arc::clone(item));
        index.link(item.id(), node);
        Ok(SlotInsertion::Inserted(slot))
    }

    /// Slot index holding the given item, if any.
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| item.id() == id))
    }

    /// Whether every slot is unused.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Raw slots, including unused ones.
    pub const fn slots(&self) -> &[Option<Arc<Gatherable>>; ITEM_SLOTS] {
        &self.slots
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Gatherable>> {
        self.slots.iter().flatten()
    }

    /// Join the names of occupied slots with `|`.
    pub fn render(&self) -> String {
        self.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}
