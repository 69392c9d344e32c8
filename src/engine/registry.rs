//! Node registry - index allocation for the component arena.
//!
//! Manages the lifecycle of node slots:
//! - Free index pool for O(1) reuse
//! - Generation counter per slot so a released id never aliases a new node
//!
//! Nodes reference each other (parent, children) by [`NodeId`] only; the
//! registry owns every node, which keeps parent links non-owning.

use std::fmt;

// =============================================================================
// NodeId
// =============================================================================

/// Handle to a node in a [`super::ComponentTree`].
///
/// Ids are cheap to copy and stay valid until the node is destroyed. After
/// that, lookups with the old id fail with [`crate::Error::StaleNode`] even if
/// the slot has been reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, stable for the node's lifetime.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Registry
// =============================================================================

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generation-checked slot storage.
pub(crate) struct Registry<T> {
    slots: Vec<Slot<T>>,
    /// Pool of freed indices for reuse.
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Registry<T> {
    /// Allocate a slot for `value`, reusing a freed index when possible.
    pub fn allocate(&mut self, value: T) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return NodeId::from_raw_parts(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        NodeId::from_raw_parts(index, 0)
    }

    /// Release a slot back to the pool. Returns the value if the id was live.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }
}

// =============================================================================
// TESTS
// =============================================================================
