//! Filesystem implementation of the [`UploadStore`] port.
//!
//! Writes go through a `cap-std` directory handle, so a stored name can never
//! escape the upload directory even if sanitisation were bypassed.

use std::io::Write as _;
use std::path::Path;

use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::StoredFilename;
use crate::domain::ports::{UploadStore, UploadStoreError};

/// Upload store rooted at a single directory.
#[derive(Debug)]
pub struct CapStdUploadStore {
    dir: Dir,
}

impl CapStdUploadStore {
    /// Create the directory if needed and open it.
    ///
    /// # Errors
    ///
    /// Returns [`UploadStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: &Path) -> Result<Self, UploadStoreError> {
        let io_error =
            |err: std::io::Error| UploadStoreError::io(format!("{}: {err}", path.display()));
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(io_error)?;
        Ok(Self { dir })
    }
}

impl UploadStore for CapStdUploadStore {
    fn store(&self, filename: &StoredFilename, bytes: &[u8]) -> Result<(), UploadStoreError> {
        let io_error = |err: std::io::Error| UploadStoreError::io(format!("{filename}: {err}"));
        let mut file = self.dir.create(filename.as_ref()).map_err(io_error)?;
        file.write_all(bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)
    }
}
