//! Controlled vocabularies used to resolve abbreviated content.
//!
//! The vocabulary service publishes a verbose JSON document mapping each
//! vocabulary name to its terms:
//!
//! ```text
//! {"languages": [{"name": "spa", "label": "Spanish", "url": "http://.../languages/#spa"}]}
//! ```
//!
//! Fetching that document is left to a [`VocabularySource`]. Conversions
//! never require vocabularies; when none are available content is left as is.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, UntlError};
use crate::schema::untl::VOCABULARIES_URL;

/// One term of a controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// The abbreviated token stored in records.
    pub name: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Canonical URL of the term.
    #[serde(default)]
    pub url: String,
}

/// Vocabulary name → terms.
pub type Vocabularies = IndexMap<String, Vec<Term>>;

/// What vocabulary resolution replaces matched content with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Leave content unchanged.
    #[default]
    Off,
    /// Replace with the term's label.
    Values,
    /// Replace with the term's URL.
    Urls,
}

/// Looks up `content` in `vocabulary` of `vocabularies`.
///
/// Returns the replacement chosen by `resolution`, or `None` when resolution
/// is off, the vocabulary is missing or no term matches.
#[must_use]
pub fn resolve<'a>(
    vocabularies: &'a Vocabularies,
    vocabulary: &str,
    content: &str,
    resolution: Resolution,
) -> Option<&'a str> {
    let term = vocabularies
        .get(vocabulary)?
        .iter()
        .find(|term| term.name == content)?;
    match resolution {
        Resolution::Off => None,
        Resolution::Values => Some(&term.label),
        Resolution::Urls => Some(&term.url),
    }
}

/// Location of the verbose vocabulary document.
#[must_use]
pub fn verbose_vocabularies_url() -> String {
    VOCABULARIES_URL.replace("all", "all-verbose")
}

/// Something that can produce the vocabulary document.
pub trait VocabularySource {
    /// Returns every vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::VocabUnavailable`] when the data cannot be
    /// obtained or decoded.
    fn fetch(&self) -> Result<Vocabularies>;
}

impl VocabularySource for Vocabularies {
    fn fetch(&self) -> Result<Vocabularies> {
        Ok(self.clone())
    }
}

/// Reads the verbose vocabulary document from a local JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonVocabularySource {
    path: PathBuf,
}

impl JsonVocabularySource {
    /// Creates a source reading `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parses the verbose vocabulary document.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::VocabUnavailable`] if `json` is not a vocabulary document.
    pub fn parse(json: &str) -> Result<Vocabularies> {
        serde_json::from_str(json)
            .map_err(|e| UntlError::VocabUnavailable(format!("Failed to parse vocabularies: {e}")))
    }
}

impl VocabularySource for JsonVocabularySource {
    fn fetch(&self) -> Result<Vocabularies> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            UntlError::VocabUnavailable(format!(
                "Failed to read vocabularies from {}: {e}",
                self.path.display()
            ))
        })?;
        Self::parse(&json)
    }
}

/// Fetches vocabularies, turning any failure into `None`.
#[must_use]
pub fn retrieve_vocabularies(source: &dyn VocabularySource) -> Option<Vocabularies> {
    match source.fetch() {
        Ok(vocabularies) => {
            debug!(count = vocabularies.len(), "retrieved vocabularies");
            Some(vocabularies)
        }
        Err(e) => {
            warn!(error = %e, "vocabularies unavailable");
            None
        }
    }
}
