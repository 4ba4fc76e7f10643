//! Port for turning uploaded document bytes into text.

use crate::domain::ExtractionOutcome;

/// Extraction engine.
///
/// Implementations never fail: unreadable input becomes
/// [`ExtractionOutcome::Failed`]. Calls are synchronous and CPU-bound, so
/// async callers should run them on a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    /// Extract text from the complete document.
    fn extract(&self, bytes: &[u8]) -> ExtractionOutcome;
}
