//! resource-cache: a single-threaded, handle-based cache for expensive,
//! file-backed resources (decoded images, opened fonts, parsed atlases).
//! Repeated requests for the same file share one instance, which is freed
//! as soon as nothing references it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one instance per dedup key, counted references, and failure
//!   atomic loading, built in small layers that can be checked on their own.
//! - Layers:
//!   - SlotArena<T>: positional slots plus a LIFO stack of free ids. Ids
//!     are slot positions; they are reused, never relocated.
//!   - ResourceManager<T>: wraps each payload with a `RefCount` and its
//!     `ResourceKey`, and maps the dedup key (first path) to the slot id.
//!   - SharedManager<T> / ResourceRef<T>: public handles. Loading a
//!     `ResourceRef` adds one reference, cloning adds one through the
//!     manager, dropping releases one.
//!   - ResourceContext: one manager per resource type, in place of
//!     process-wide singletons.
//!
//! Invariants
//! - The number of live `ResourceRef`s for an id equals that resource's
//!   reference count.
//! - The dedup map holds an entry iff a live resource exists for the key,
//!   and at most one live slot per key.
//! - A count never reads 0 on a live resource; reaching 0 destroys the
//!   payload exactly once and pushes the id on the free list.
//!
//! Failure semantics
//! - `load` with an empty key list fails with `LoadError::EmptyKey` and
//!   touches nothing.
//! - A failing `Resource::load` is returned as `LoadError::Construction`
//!   unchanged. No dedup entry is created and no slot is consumed. When the
//!   failed load had popped a recycled id, `FailedSlotPolicy` decides whether
//!   it goes back on the free list (default) or is stranded.
//! - `unload`/`release` of an unknown or already free id logs a warning
//!   and returns; `get` on such an id panics, since a live handle can
//!   never observe it.
//!
//! Reentrancy
//! - Cache hits, clones and non-final drops only touch the count under a
//!   shared borrow, so they coexist with outstanding `get`/`keys` guards.
//! - The final `ResourceRef::drop` unlinks the resource under a mutable
//!   borrow and drops the payload after the borrow ends, so payloads may
//!   hold handles into the same manager.
//! - `Resource::load` runs while the manager is mutably borrowed; loading
//!   from the same manager inside it panics.
//!
//! Notes and non-goals
//! - Single-threaded: `!Send`/`!Sync`, no atomics or locks.
//! - No eviction beyond reference counting, no persistence.
//! - Logging goes through `tracing`; the crate never installs a subscriber.

mod config;
mod context;
mod error;
mod file;
mod handle;
mod key;
mod manager;
mod refcount;
mod slot_arena;

// Public surface
pub use config::{CacheConfig, FailedSlotPolicy};
pub use context::ResourceContext;
pub use error::{EmptyKey, LoadError};
pub use file::{FileError, FileResource};
pub use handle::{ResourceRef, SharedManager};
pub use key::ResourceKey;
pub use manager::{Release, Resource, ResourceManager};
pub use refcount::RefCount;
pub use slot_arena::{ResourceId, SlotArena};
