//! ResourceManager: dedup map and reference counting atop SlotArena.

use crate::config::CacheConfig;
use crate::error::{EmptyKey, LoadError};
use crate::key::ResourceKey;
use crate::refcount::RefCount;
use crate::slot_arena::{ResourceId, SlotArena};
use hashbrown::HashMap;
use tracing::{debug, trace, warn};

/// A file-backed payload the cache can build.
///
/// Implementors are constructed from the full key list on a cache miss and
/// dropped when their last reference is released. A failing `load` must not
/// leave anything behind; the manager commits no bookkeeping for it.
pub trait Resource: Sized {
    type Error;

    fn load(key: &ResourceKey) -> Result<Self, Self::Error>;
}

#[derive(Debug)]
struct Counted<T> {
    refcount: RefCount,
    key: ResourceKey,
    value: T,
}

/// Result of releasing one reference.
#[derive(Debug)]
pub enum Release<T> {
    /// Other references remain.
    Retained { remaining: usize },
    /// That was the last reference. The slot is already free and the dedup
    /// entry gone; the caller owns the payload.
    Destroyed(T),
    /// The id was out of range or already free. Nothing changed.
    Unrecognized,
}

impl<T> Release<T> {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Release::Destroyed(_))
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Release::Unrecognized)
    }
}

/// Cache of `T` instances keyed by the first path of their `ResourceKey`.
pub struct ResourceManager<T> {
    slots: SlotArena<Counted<T>>,
    index: HashMap<String, ResourceId>,
}

impl<T> ResourceManager<T> {
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        let mut slots = SlotArena::with_policy(config.failed_slot_policy);
        slots.reserve(config.initial_capacity);
        Self {
            slots,
            index: HashMap::with_capacity(config.initial_capacity),
        }
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.slot_count()
    }

    /// Free ids; the last one is reused first.
    pub fn free_ids(&self) -> &[ResourceId] {
        self.slots.free_ids()
    }

    pub fn stranded(&self) -> usize {
        self.slots.stranded()
    }

    pub fn contains_key(&self, dedup_key: &str) -> bool {
        self.index.contains_key(dedup_key)
    }

    /// Id of the live resource for `dedup_key`. Does not add a reference.
    pub fn find(&self, dedup_key: &str) -> Option<ResourceId> {
        self.index.get(dedup_key).copied()
    }

    pub fn reference_count(&self, id: ResourceId) -> Option<usize> {
        self.slots.get(id).map(|c| c.refcount.get())
    }

    pub fn keys(&self, id: ResourceId) -> Option<&ResourceKey> {
        self.slots.get(id).map(|c| &c.key)
    }

    pub fn try_get(&self, id: ResourceId) -> Option<&T> {
        self.slots.get(id).map(|c| &c.value)
    }

    /// Borrow the resource at `id`.
    ///
    /// # Panics
    ///
    /// If `id` is out of range or free. A holder of a live reference can
    /// never see that, so reaching it means the counts are already broken.
    pub fn get(&self, id: ResourceId) -> &T {
        &self.live(id).value
    }

    /// Add a reference to a live resource. Same effect as a load hit.
    ///
    /// # Panics
    ///
    /// Under the same conditions as `get`.
    pub fn retain(&self, id: ResourceId) {
        let entry = self.live(id);
        entry.refcount.retain();
        trace!(id, refcount = entry.refcount.get(), "resource retained");
    }

    /// Add a reference to the live resource for `dedup_key`, if there is one.
    ///
    /// This is the hit half of `load`; it only touches the counter, so it
    /// works through a shared borrow.
    pub fn acquire(&self, dedup_key: &str) -> Option<ResourceId> {
        let id = *self.index.get(dedup_key)?;
        let entry = self
            .slots
            .get(id)
            .expect("dedup entry must point at a live slot");
        entry.refcount.retain();
        trace!(id, key = dedup_key, refcount = entry.refcount.get(), "resource cache hit");
        Some(id)
    }

    /// Drop one reference to `id` without unlinking anything.
    ///
    /// Returns the remaining count, or `None` for an unrecognized id (a
    /// warning is logged). A result of `Some(0)` must be followed by `evict`.
    pub(crate) fn release_ref(&self, id: ResourceId) -> Option<usize> {
        let Some(entry) = self.slots.get(id) else {
            warn!(id, "tried to unload resource with unrecognized id");
            return None;
        };
        entry.refcount.release();
        let remaining = entry.refcount.get();
        trace!(id, remaining, "resource released");
        Some(remaining)
    }

    /// Free the slot of a resource whose count has reached zero and remove
    /// its dedup entries. Returns the payload without dropping it.
    pub(crate) fn evict(&mut self, id: ResourceId) -> Option<T> {
        if self.slots.get(id)?.refcount.get() != 0 {
            return None;
        }
        let Counted { key, value, .. } = self.slots.vacate(id)?;
        // Full scan: drop every entry pointing at this id, not just the one
        // under `key`.
        self.index.retain(|_, mapped| *mapped != id);
        debug!(id, key = key.dedup_key(), "resource destroyed");
        Some(value)
    }

    /// Drop one reference to `id`, unlinking the resource if it was the last.
    ///
    /// Invalid ids are tolerated: a warning is logged and state is left as is.
    pub fn release(&mut self, id: ResourceId) -> Release<T> {
        match self.release_ref(id) {
            None => Release::Unrecognized,
            Some(0) => Release::Destroyed(
                self.evict(id)
                    .expect("slot must be occupied when its count reaches zero"),
            ),
            Some(remaining) => Release::Retained { remaining },
        }
    }

    /// Drop one reference to `id`, destroying the resource if it was the last.
    pub fn unload(&mut self, id: ResourceId) {
        let _ = self.release(id);
    }

    /// Live resources in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &ResourceKey, &T)> {
        self.slots.iter().map(|(id, c)| (id, &c.key, &c.value))
    }

    fn live(&self, id: ResourceId) -> &Counted<T> {
        match self.slots.get(id) {
            Some(entry) => entry,
            None => panic!(
                "resource id {id} is not live (slot count {})",
                self.slots.slot_count()
            ),
        }
    }
}

impl<T: Resource> ResourceManager<T> {
    /// Acquire a reference to the resource identified by `keys[0]`,
    /// constructing it from `keys` if none is live.
    ///
    /// On a construction failure no dedup entry is created and no slot is
    /// consumed; the error is returned as produced by `T::load`.
    pub fn load<S>(&mut self, keys: &[S]) -> Result<ResourceId, LoadError<T::Error>>
    where
        S: AsRef<str>,
    {
        let dedup = keys.first().ok_or(EmptyKey)?.as_ref();
        if let Some(id) = self.acquire(dedup) {
            return Ok(id);
        }

        let key = ResourceKey::new(keys.iter().map(|k| k.as_ref()))?;
        let id = self
            .slots
            .try_insert_with(|_| match T::load(&key) {
                Ok(value) => Ok(Counted {
                    refcount: RefCount::new(),
                    key,
                    value,
                }),
                Err(e) => Err(e),
            })
            .map_err(|e| {
                debug!(key = dedup, "resource construction failed");
                LoadError::Construction(e)
            })?;
        self.index.insert(dedup.to_owned(), id);
        debug!(id, key = dedup, "resource constructed");
        Ok(id)
    }
}

impl<T> Default for ResourceManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ResourceManager<T> {
    fn drop(&mut self) {
        if !self.is_empty() {
            debug!(live = self.len(), "resource manager dropped with live resources");
        }
    }
}
