//! ResourceKey: the ordered list of paths a resource is built from.

use crate::error::EmptyKey;
use core::fmt;

/// Non-empty, ordered list of strings identifying the files behind one
/// resource. The first element is the dedup key: loads that share it share
/// one resource.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ResourceKey(Vec<String>);

impl ResourceKey {
    pub fn new<I, S>(paths: I) -> Result<Self, EmptyKey>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(EmptyKey);
        }
        Ok(Self(paths))
    }

    pub fn dedup_key(&self) -> &str {
        &self.0[0]
    }

    pub fn paths(&self) -> &[String] {
        &self.0
    }

    /// Path at `index`, if the key is that long.
    pub fn path(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A key is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<String>> for ResourceKey {
    type Error = EmptyKey;

    fn try_from(paths: Vec<String>) -> Result<Self, Self::Error> {
        if paths.is_empty() {
            return Err(EmptyKey);
        }
        Ok(Self(paths))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}
