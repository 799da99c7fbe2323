//! SlotArena: positional storage with a LIFO free list of ids.

use crate::config::FailedSlotPolicy;
use tracing::warn;

/// Position of a slot in a `SlotArena`. Stable while the slot is occupied;
/// reused once it has been freed.
pub type ResourceId = usize;

/// Arena of optionally-occupied slots.
///
/// Ids are never relocated. A freed id is pushed on a stack and the next
/// insertion pops it, so the most recently freed id is reused first.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free: Vec<ResourceId>,
    policy: FailedSlotPolicy,
    stranded: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_policy(FailedSlotPolicy::default())
    }

    pub fn with_policy(policy: FailedSlotPolicy) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            policy,
            stranded: 0,
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Total number of slots, occupied or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len() - self.stranded
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free ids from the bottom of the stack to the top; the last one is the
    /// next to be reused.
    pub fn free_ids(&self) -> &[ResourceId] {
        &self.free
    }

    /// Ids lost to failed constructions under `FailedSlotPolicy::Strand`.
    pub fn stranded(&self) -> usize {
        self.stranded
    }

    pub fn is_occupied(&self, id: ResourceId) -> bool {
        matches!(self.slots.get(id), Some(Some(_)))
    }

    pub fn get(&self, id: ResourceId) -> Option<&T> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut T> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    /// Construct a value into a free slot, or a new slot at the end.
    ///
    /// `f` receives the id the value will occupy. On failure the arena keeps
    /// its length; a popped id is handled per the arena's policy.
    pub fn try_insert_with<F, E>(&mut self, f: F) -> Result<ResourceId, E>
    where
        F: FnOnce(ResourceId) -> Result<T, E>,
    {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id].is_none(), "free list holds an occupied id");
                match f(id) {
                    Ok(value) => {
                        self.slots[id] = Some(value);
                        Ok(id)
                    }
                    Err(e) => {
                        match self.policy {
                            FailedSlotPolicy::Reclaim => self.free.push(id),
                            FailedSlotPolicy::Strand => {
                                self.stranded += 1;
                                warn!(id, "slot id stranded by failed construction");
                            }
                        }
                        Err(e)
                    }
                }
            }
            None => {
                let id = self.slots.len();
                let value = f(id)?;
                self.slots.push(Some(value));
                Ok(id)
            }
        }
    }

    /// Take the value out of an occupied slot and mark the id free.
    pub fn vacate(&mut self, id: ResourceId) -> Option<T> {
        let value = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        Some(value)
    }

    /// Occupied slots in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (id, v)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
