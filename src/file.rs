//! FileResource: raw file contents loaded through the cache.

use crate::key::ResourceKey;
use crate::manager::Resource;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A path in the key list could not be read.
#[derive(Debug, Error)]
#[error("failed to read resource file `{}`", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The bytes of every file in a key list, read when the resource is first
/// loaded. Decoders for images, fonts or atlas descriptors can sit on top
/// of this and share the cached bytes.
#[derive(Debug)]
pub struct FileResource {
    contents: Vec<Vec<u8>>,
}

impl FileResource {
    /// Contents of the file at `index` in the key list.
    pub fn bytes(&self, index: usize) -> Option<&[u8]> {
        self.contents.get(index).map(Vec::as_slice)
    }

    /// Contents of the first file.
    pub fn primary(&self) -> &[u8] {
        &self.contents[0]
    }

    pub fn total_len(&self) -> usize {
        self.contents.iter().map(Vec::len).sum()
    }
}

impl Resource for FileResource {
    type Error = FileError;

    fn load(key: &ResourceKey) -> Result<Self, FileError> {
        let contents = key
            .paths()
            .iter()
            .map(|path| {
                std::fs::read(path).map_err(|source| FileError {
                    path: PathBuf::from(path),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { contents })
    }
}
