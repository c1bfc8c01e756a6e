//! Error types for the form filler.
//!
//! Every failure here is fatal for the fill that raised it: the write session has no partial
//! rollback, so callers discard the pending output and keep the source document untouched.

use crate::object::ObjectRef;

/// Result type alias for form filling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while filling a form.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trailer has no resolvable /Root catalog
    #[error("Document catalog (/Root) not found")]
    MissingCatalog,

    /// Catalog has no resolvable /AcroForm dictionary
    #[error("Interactive form (/AcroForm) not found")]
    MissingForm,

    /// A required dictionary entry is absent
    #[error("Missing /{key} in {context}")]
    MissingEntry {
        /// Dictionary key that was expected
        key: String,
        /// Where the key was looked up
        context: String,
    },

    /// Referenced object not found in the document
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectRef),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Circular reference detected in the field tree
    #[error("Circular reference detected: object {0}")]
    CircularReference(ObjectRef),

    /// Field tree nested deeper than the configured bound
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(usize),

    /// Write session open/close calls out of order
    #[error("Unbalanced write session: {0}")]
    UnbalancedWrite(String),

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed field values input
    #[error("Invalid field values: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF file could not be loaded or saved
    #[error("PDF backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Shorthand for a type mismatch on a resolved object.
    pub(crate) fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::InvalidObjectType {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Shorthand for a missing dictionary entry.
    pub(crate) fn missing(key: &str, context: impl Into<String>) -> Self {
        Error::MissingEntry {
            key: key.to_string(),
            context: context.into(),
        }
    }
}
