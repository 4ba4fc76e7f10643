//! Extracted document records and upload filename rules.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::ExtractionOutcome;

/// Maximum stored filename length, in bytes.
pub const FILENAME_MAX: usize = 255;

/// Reserved device names that must not be used as bare filenames on Windows.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

/// Identifier assigned by the record store; increases with insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Wrap a raw identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an upload was refused before anything touched disk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    #[error("No file selected.")]
    MissingFile,
    #[error("Only PDF files are allowed.")]
    DisallowedExtension { filename: String },
    #[error("The file name cannot be used.")]
    UnusableFilename { filename: String },
}

static UNSAFE_CHARS_RE: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars_regex() -> &'static Regex {
    UNSAFE_CHARS_RE.get_or_init(|| {
        Regex::new(r"[^A-Za-z0-9_.-]")
            .unwrap_or_else(|error| panic!("filename regex failed to compile: {error}"))
    })
}

/// Filename that is safe to join onto the upload directory.
///
/// Produced by [`StoredFilename::sanitize`]: accented letters are folded to
/// ASCII (NFKD, then non-ASCII dropped), path separators become word breaks,
/// whitespace runs collapse to `_`, characters outside `[A-Za-z0-9_.-]` are
/// dropped, and leading/trailing `.` or `_` are removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredFilename(String);

impl StoredFilename {
    /// Sanitize a client-supplied filename.
    ///
    /// Returns `None` when nothing usable remains.
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::StoredFilename;
    ///
    /// let name = StoredFilename::sanitize("../../etc/my report.pdf").unwrap();
    /// assert_eq!(name.as_ref(), "etc_my_report.pdf");
    /// let name = StoredFilename::sanitize("résumé.pdf").unwrap();
    /// assert_eq!(name.as_ref(), "resume.pdf");
    /// assert!(StoredFilename::sanitize("../..").is_none());
    /// ```
    pub fn sanitize(raw: &str) -> Option<Self> {
        let folded: String = raw.nfkd().filter(char::is_ascii).collect();
        let separated = folded.replace(['/', '\\'], " ");
        let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
        let filtered = unsafe_chars_regex().replace_all(&joined, "");
        let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');
        if trimmed.is_empty() {
            return None;
        }

        let stem = trimmed.split('.').next().unwrap_or_default();
        let reserved =
            cfg!(windows) && WINDOWS_DEVICE_NAMES.contains(&stem.to_ascii_uppercase().as_str());
        let mut name = if reserved {
            format!("_{trimmed}")
        } else {
            trimmed.to_owned()
        };
        truncate_keeping_extension(&mut name);
        Some(Self(name))
    }

    /// Rewrap a name previously produced by [`StoredFilename::sanitize`],
    /// e.g. when reading records back from storage.
    pub fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

fn truncate_keeping_extension(name: &mut String) {
    if name.len() <= FILENAME_MAX {
        return;
    }
    let extension = name
        .rfind('.')
        .map(|idx| name.split_off(idx))
        .unwrap_or_default();
    let keep = FILENAME_MAX.saturating_sub(extension.len());
    // Sanitized names are ASCII, so any byte offset is a char boundary.
    name.truncate(keep);
    name.push_str(&extension);
}

impl AsRef<str> for StoredFilename {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StoredFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which uploads are accepted.
///
/// Extensions are compared case-insensitively, so `report.PDF` passes a
/// policy allowing `pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: BTreeSet<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(["pdf"])
    }
}

impl UploadPolicy {
    /// Build a policy from extension names, with or without a leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { allowed_extensions }
    }

    /// Allowed extensions, lowercased.
    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    /// Whether the filename ends in an allowed extension.
    pub fn allows(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.allowed_extensions.contains(&ext.to_ascii_lowercase()))
    }

    /// Validate a client filename and produce the name to store it under.
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::{UploadPolicy, UploadValidationError};
    ///
    /// let policy = UploadPolicy::default();
    /// assert_eq!(policy.validate("Report.PDF").unwrap().as_ref(), "Report.PDF");
    /// assert!(matches!(
    ///     policy.validate("notes.txt"),
    ///     Err(UploadValidationError::DisallowedExtension { .. })
    /// ));
    /// ```
    pub fn validate(&self, filename: &str) -> Result<StoredFilename, UploadValidationError> {
        if filename.trim().is_empty() {
            return Err(UploadValidationError::MissingFile);
        }
        if !self.allows(filename) {
            return Err(UploadValidationError::DisallowedExtension {
                filename: filename.to_owned(),
            });
        }
        let stored = StoredFilename::sanitize(filename).ok_or_else(|| {
            UploadValidationError::UnusableFilename {
                filename: filename.to_owned(),
            }
        })?;
        if !self.allows(stored.as_ref()) {
            return Err(UploadValidationError::UnusableFilename {
                filename: filename.to_owned(),
            });
        }
        Ok(stored)
    }
}

/// Record handed to the store for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub filename: StoredFilename,
    pub outcome: ExtractionOutcome,
    pub uploaded_at: DateTime<Utc>,
}

/// Persisted extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    id: DocumentId,
    filename: StoredFilename,
    outcome: ExtractionOutcome,
    uploaded_at: DateTime<Utc>,
}

impl ExtractedDocument {
    /// Attach the store-assigned id to a new record.
    pub fn new(id: DocumentId, document: NewDocument) -> Self {
        let NewDocument {
            filename,
            outcome,
            uploaded_at,
        } = document;
        Self {
            id,
            filename,
            outcome,
            uploaded_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Sanitized upload name.
    pub fn filename(&self) -> &StoredFilename {
        &self.filename
    }

    /// Tagged extraction result.
    pub fn outcome(&self) -> &ExtractionOutcome {
        &self.outcome
    }

    /// When the upload was processed.
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}
