//! Error types for UNTL operations.
//!
//! This module provides the [`UntlError`] type for all library operations
//! and the [`Result`] convenience type.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Schema;

/// Error type for all UNTL library operations.
///
/// Represents the error conditions that can occur while building element
/// trees, parsing documents, or writing generated output.
#[derive(Error, Debug)]
pub enum UntlError {
    /// An element capability or nesting rule was violated.
    ///
    /// Raised when content or a qualifier is set on an element that does not
    /// allow it, or when a child is added under a parent that does not list
    /// its tag.
    #[error("{0}")]
    Structure(String),

    /// A tag was encountered that the active schema does not define.
    #[error("Element \"{tag}\" not in {schema} dispatch.")]
    UnknownElement {
        /// The offending tag, with any namespace prefix removed.
        tag: String,
        /// The schema the tag was looked up in.
        schema: Schema,
    },

    /// Parallel form-post value lists for one tag had different lengths.
    #[error("Field values did not match up numerically for {0}")]
    NumericMismatch(String),

    /// A generated document could not be written to its target file.
    #[error("Failed to create XML file. File: {}", path.display())]
    Generation {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Controlled-vocabulary data could not be obtained or decoded.
    #[error("Vocabulary data unavailable: {0}")]
    VocabUnavailable(String),

    /// Error during parsing or serialization of XML, JSON or RDF.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`UntlError`].
pub type Result<T> = std::result::Result<T, UntlError>;
