//! SharedManager and ResourceRef: the handle-based public surface.

use crate::config::CacheConfig;
use crate::error::{EmptyKey, LoadError};
use crate::key::ResourceKey;
use crate::manager::{Resource, ResourceManager};
use crate::slot_arena::ResourceId;
use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

/// A `ResourceManager` shared between the handles it has issued.
pub struct SharedManager<T> {
    inner: Rc<RefCell<ResourceManager<T>>>,
}

impl<T> SharedManager<T> {
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ResourceManager::with_config(config))),
        }
    }

    /// Read access to the underlying manager, for diagnostics.
    ///
    /// Handles may be cloned, dropped and reloaded while this borrow is held,
    /// except for a load that has to construct or a drop that destroys; those
    /// panic.
    pub fn borrow(&self) -> std::cell::Ref<'_, ResourceManager<T>> {
        self.inner.borrow()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn contains_key(&self, dedup_key: &str) -> bool {
        self.inner.borrow().contains_key(dedup_key)
    }
}

impl<T: Resource> SharedManager<T> {
    /// Load a resource and wrap its id in a handle.
    pub fn load<S>(&self, keys: &[S]) -> Result<ResourceRef<T>, LoadError<T::Error>>
    where
        S: AsRef<str>,
    {
        ResourceRef::load(self, keys)
    }
}

impl<T> Clone for SharedManager<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for SharedManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A counted reference to a cached resource.
///
/// Each live `ResourceRef` accounts for exactly one unit of its resource's
/// reference count. Cloning goes back through the manager to add a unit;
/// dropping releases one, destroying the resource with the last.
pub struct ResourceRef<T> {
    manager: Rc<RefCell<ResourceManager<T>>>, // keep owner alive
    id: ResourceId,
}

impl<T: Resource> ResourceRef<T> {
    pub fn load<S>(manager: &SharedManager<T>, keys: &[S]) -> Result<Self, LoadError<T::Error>>
    where
        S: AsRef<str>,
    {
        let dedup = keys.first().ok_or(EmptyKey)?.as_ref();
        // A hit only touches the count, so it must not conflict with live
        // `get` guards.
        let hit = manager.inner.borrow().acquire(dedup);
        let id = match hit {
            Some(id) => id,
            None => manager.inner.borrow_mut().load(keys)?,
        };
        Ok(Self {
            manager: manager.inner.clone(),
            id,
        })
    }
}

impl<T> ResourceRef<T> {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Borrow the resource. Side-effect free.
    pub fn get(&self) -> std::cell::Ref<'_, T> {
        std::cell::Ref::map(self.manager.borrow(), |m| m.get(self.id))
    }

    pub fn keys(&self) -> std::cell::Ref<'_, ResourceKey> {
        std::cell::Ref::map(self.manager.borrow(), |m| {
            m.keys(self.id)
                .expect("a live ResourceRef always refers to a live slot")
        })
    }

    pub fn reference_count(&self) -> usize {
        self.manager
            .borrow()
            .reference_count(self.id)
            .expect("a live ResourceRef always refers to a live slot")
    }

    /// The manager this handle belongs to.
    pub fn manager(&self) -> SharedManager<T> {
        SharedManager {
            inner: self.manager.clone(),
        }
    }
}

impl<T> Clone for ResourceRef<T> {
    fn clone(&self) -> Self {
        self.manager.borrow().retain(self.id);
        Self {
            manager: self.manager.clone(),
            id: self.id,
        }
    }
}

impl<T> Drop for ResourceRef<T> {
    fn drop(&mut self) {
        let remaining = self.manager.borrow().release_ref(self.id);
        if remaining == Some(0) {
            // Unlink under the borrow, drop the payload after it ends so the
            // payload's own Drop may release handles into this manager.
            let evicted = self.manager.borrow_mut().evict(self.id);
            drop(evicted);
        }
    }
}

impl<T> PartialEq for ResourceRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.manager, &other.manager) && self.id == other.id
    }
}

impl<T> Eq for ResourceRef<T> {}

impl<T> Hash for ResourceRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.manager) as *const () as usize).hash(state);
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for ResourceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRef").field("id", &self.id).finish()
    }
}
