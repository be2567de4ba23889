//! Entity pools with deferred removal
//!
//! Stages iterate a pool, mark entities that are done, and the tick compacts
//! every pool once at the end. Nothing is spliced out mid-iteration.

/// Identifier shared by every pooled entity (unique across pools)
pub type EntityId = u32;

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    value: T,
    retired: bool,
}

/// Ordered collection of live entities of one category
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append an entity. Ids must come from the session-wide counter.
    pub fn insert(&mut self, id: EntityId, value: T) {
        self.slots.push(Slot {
            id,
            value,
            retired: false,
        });
    }

    /// Number of entities not yet compacted away (retired ones included)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live entities in spawn order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .filter(|s| !s.retired)
            .map(|s| (s.id, &s.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .filter(|s| !s.retired)
            .map(|s| (s.id, &mut s.value))
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .iter()
            .find(|s| s.id == id && !s.retired)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id && !s.retired)
            .map(|s| &mut s.value)
    }

    /// Most recently spawned live entity
    pub fn newest(&self) -> Option<(EntityId, &T)> {
        self.slots
            .iter()
            .rev()
            .find(|s| !s.retired)
            .map(|s| (s.id, &s.value))
    }

    /// Mark an entity for removal at the next `compact`
    pub fn retire(&mut self, id: EntityId) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.retired = true;
        }
    }

    /// Mark every live entity matching `pred` for removal
    pub fn retire_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        for slot in &mut self.slots {
            if !slot.retired && pred(&slot.value) {
                slot.retired = true;
            }
        }
    }

    /// Drop all retired entities, returning how many went away
    pub fn compact(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| !s.retired);
        before - self.slots.len()
    }

    /// Remove everything immediately (session reset)
    pub fn clear(&mut self) -> usize {
        let n = self.slots.len();
        self.slots.clear();
        n
    }
}
