//! Error types surfaced by loading.

use thiserror::Error;

/// A key list was empty. Every resource is identified by at least one path.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("a resource must be identified by at least one key")]
pub struct EmptyKey;

/// Failure of `ResourceManager::load`.
///
/// `E` is the error type of the resource being constructed. Construction
/// failures are passed through untouched.
#[derive(Debug, Error)]
pub enum LoadError<E> {
    /// The caller supplied an empty key list. Nothing was allocated.
    #[error(transparent)]
    EmptyKey(#[from] EmptyKey),
    /// The resource failed to build from its keys.
    #[error(transparent)]
    Construction(E),
}

impl<E> LoadError<E> {
    pub fn is_empty_key(&self) -> bool {
        matches!(self, LoadError::EmptyKey(_))
    }

    /// The construction error, if that is what this is.
    pub fn into_construction(self) -> Option<E> {
        match self {
            LoadError::Construction(e) => Some(e),
            LoadError::EmptyKey(_) => None,
        }
    }
}
