//! Port for keeping the raw bytes of uploaded files.

use crate::domain::StoredFilename;

use super::define_port_error;

define_port_error! {
    /// Errors raised by upload store adapters.
    pub enum UploadStoreError {
        /// Writing the file failed.
        Io { message: String } => "failed to store upload: {message}",
    }
}

/// Destination for raw upload bytes.
///
/// Writing an existing name replaces the previous file.
#[cfg_attr(test, mockall::automock)]
pub trait UploadStore: Send + Sync {
    /// Write `bytes` under `filename`.
    fn store(&self, filename: &StoredFilename, bytes: &[u8]) -> Result<(), UploadStoreError>;
}
