//! Outcome of running text extraction over an uploaded document.
//!
//! Extraction never fails as far as callers are concerned: every input maps
//! to exactly one [`ExtractionOutcome`]. The legacy sentinel strings are only
//! produced by [`ExtractionOutcome::display_text`] at the presentation edge.

use std::fmt;

/// Text presented when a document parsed cleanly but carried no text.
pub const NO_TEXT_SENTINEL: &str = "No text found in PDF.";
/// Prefix presented in front of the failure reason.
pub const FAILURE_PREFIX: &str = "Error extracting text: ";

/// Tagged result of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Non-empty text, already stripped of surrounding whitespace.
    Extracted(String),
    /// The document opened but yielded no text.
    Empty,
    /// The document could not be opened or parsed.
    Failed(String),
}

impl ExtractionOutcome {
    /// Join per-page text in document order with newlines and strip the
    /// result, mapping whitespace-only output to [`ExtractionOutcome::Empty`].
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::ExtractionOutcome;
    ///
    /// let outcome = ExtractionOutcome::from_pages(["  Hello", "World \n"]);
    /// assert_eq!(outcome, ExtractionOutcome::Extracted("Hello\nWorld".into()));
    /// assert_eq!(ExtractionOutcome::from_pages([" ", "\n"]), ExtractionOutcome::Empty);
    /// ```
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = pages
            .into_iter()
            .map(|page| page.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        let stripped = joined.trim();
        if stripped.is_empty() {
            Self::Empty
        } else {
            Self::Extracted(stripped.to_owned())
        }
    }

    /// Record a failure with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Storage tag for this outcome.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Extracted(_) => OutcomeKind::Extracted,
            Self::Empty => OutcomeKind::Empty,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Raw stored content: the text, the failure reason, or nothing.
    pub fn content(&self) -> &str {
        match self {
            Self::Extracted(text) | Self::Failed(text) => text.as_str(),
            Self::Empty => "",
        }
    }

    /// Rebuild an outcome from its stored tag and content.
    pub fn from_parts(kind: OutcomeKind, content: String) -> Self {
        match kind {
            OutcomeKind::Extracted => Self::Extracted(content),
            OutcomeKind::Empty => Self::Empty,
            OutcomeKind::Failed => Self::Failed(content),
        }
    }

    /// Text shown to users, compatible with the sentinel conventions.
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::ExtractionOutcome;
    ///
    /// assert_eq!(ExtractionOutcome::Empty.display_text(), "No text found in PDF.");
    /// assert_eq!(
    ///     ExtractionOutcome::failed("bad xref").display_text(),
    ///     "Error extracting text: bad xref"
    /// );
    /// ```
    pub fn display_text(&self) -> String {
        match self {
            Self::Extracted(text) => text.clone(),
            Self::Empty => NO_TEXT_SENTINEL.to_owned(),
            Self::Failed(reason) => format!("{FAILURE_PREFIX}{reason}"),
        }
    }
}

/// Storage tag of an [`ExtractionOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Extracted,
    Empty,
    Failed,
}

impl OutcomeKind {
    /// Stable lowercase tag persisted alongside the content.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Empty => "empty",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored tag is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown extraction outcome tag: {0}")]
pub struct UnknownOutcomeKind(pub String);

impl std::str::FromStr for OutcomeKind {
    type Err = UnknownOutcomeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extracted" => Ok(Self::Extracted),
            "empty" => Ok(Self::Empty),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownOutcomeKind(other.to_owned())),
        }
    }
}
