//! PDF implementation of the [`TextExtractor`] port built on `pdf-extract`.
//!
//! `pdf-extract` panics on some malformed documents instead of returning an
//! error, so every call runs under [`std::panic::catch_unwind`] and a panic
//! becomes [`ExtractionOutcome::Failed`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::domain::ExtractionOutcome;
use crate::domain::ports::TextExtractor;

/// Extracts per-page text from PDF bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .map_or_else(
            || "PDF parser panicked".to_owned(),
            |msg| format!("PDF parser panicked: {msg}"),
        )
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractionOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        let outcome = match result {
            Ok(Ok(pages)) => ExtractionOutcome::from_pages(pages),
            Ok(Err(err)) => ExtractionOutcome::failed(err.to_string()),
            Err(payload) => ExtractionOutcome::failed(panic_reason(payload.as_ref())),
        };
        match &outcome {
            ExtractionOutcome::Failed(reason) => warn!(%reason, "pdf extraction failed"),
            other => debug!(outcome = %other.kind(), "pdf extraction finished"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"hello, world".as_slice())]
    #[case(b"%PDF-1.4\n%%EOF".as_slice())]
    fn garbage_input_fails_without_panicking(#[case] bytes: &[u8]) {
        let outcome = PdfTextExtractor::new().extract(bytes);
        assert!(matches!(outcome, ExtractionOutcome::Failed(_)));
        assert!(outcome.display_text().starts_with("Error extracting text: "));
    }

    #[rstest]
    fn extraction_is_deterministic() {
        let extractor = PdfTextExtractor::new();
        assert_eq!(extractor.extract(b"not a pdf"), extractor.extract(b"not a pdf"));
    }

    #[rstest]
    #[case(Box::new("bad xref") as Box<dyn Any + Send>, "PDF parser panicked: bad xref")]
    #[case(Box::new(String::from("oops")) as Box<dyn Any + Send>, "PDF parser panicked: oops")]
    #[case(Box::new(7_u8) as Box<dyn Any + Send>, "PDF parser panicked")]
    fn panic_payloads_become_reasons(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(panic_reason(payload.as_ref()), expected);
    }
}
