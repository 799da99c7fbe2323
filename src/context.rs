//! ResourceContext: one shared manager per resource kind.

use crate::config::CacheConfig;
use crate::error::LoadError;
use crate::handle::{ResourceRef, SharedManager};
use crate::manager::Resource;
use core::any::{Any, TypeId};
use hashbrown::HashMap;

/// Owns a `SharedManager<T>` for every resource type `T` loaded through it.
///
/// Pass the context (or a manager taken from it) to whichever module loads
/// that kind of resource. Managers are created on first use and share the
/// context's `CacheConfig`.
#[derive(Default)]
pub struct ResourceContext {
    config: CacheConfig,
    managers: HashMap<TypeId, Box<dyn Any>>,
}

impl ResourceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            managers: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The manager for `T`, created if this is the first request for it.
    pub fn manager<T: Resource + 'static>(&mut self) -> SharedManager<T> {
        let config = &self.config;
        self.managers
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SharedManager::<T>::with_config(config)) as Box<dyn Any>)
            .downcast_ref::<SharedManager<T>>()
            .expect("managers are keyed by their resource type")
            .clone()
    }

    /// The manager for `T` if one exists already.
    pub fn get<T: Resource + 'static>(&self) -> Option<SharedManager<T>> {
        self.managers
            .get(&TypeId::of::<T>())
            .and_then(|m| m.downcast_ref::<SharedManager<T>>())
            .cloned()
    }

    pub fn load<T, S>(&mut self, keys: &[S]) -> Result<ResourceRef<T>, LoadError<T::Error>>
    where
        T: Resource + 'static,
        S: AsRef<str>,
    {
        self.manager::<T>().load(keys)
    }

    /// Number of resource kinds with a manager.
    pub fn kinds(&self) -> usize {
        self.managers.len()
    }
}
