//! RDF rendering of Dublin Core dictionaries.
//!
//! Every DC value becomes one `dc:` triple about the record. The record is
//! named by its `ark: ark:/...` identifier rewritten to an `info:ark/...`
//! IRI, or by a blank node when the dictionary carries no ark. Values that
//! look like URLs become IRIs; everything else is a plain literal.
//!
//! # Examples
//!
//! ```ignore
//! use untl::rdf::{generate_rdf, RdfFormat};
//!
//! let turtle = generate_rdf(&dc_dict, RdfFormat::Turtle)?;
//! assert!(turtle.contains("@prefix dc:"));
//! # Ok::<(), untl::UntlError>(())
//! ```

use std::fmt;
use std::io::Write;

use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use oxrdfio::{RdfFormat as OxRdfFormat, RdfSerializer};
use tracing::{debug, trace};

use crate::dict::MetadataDict;
use crate::error::{Result, UntlError};
use crate::schema::dublin_core::{DC_NAMESPACE, DC_ORDER};

/// Identifier prefix marking a record's ark in a DC dictionary.
pub const ARK_PREFIX: &str = "ark: ark:";

/// Replacement for [`ARK_PREFIX`] in the subject IRI.
pub const INFO_ARK_PREFIX: &str = "info:ark";

/// RDF serialization syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RdfFormat {
    /// RDF/XML (application/rdf+xml)
    #[default]
    RdfXml,
    /// Turtle (text/turtle)
    Turtle,
    /// N-Triples (application/n-triples)
    NTriples,
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdfXml => write!(f, "RDF/XML"),
            Self::Turtle => write!(f, "Turtle"),
            Self::NTriples => write!(f, "N-Triples"),
        }
    }
}

impl RdfFormat {
    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::RdfXml => "application/rdf+xml",
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
        }
    }

    const fn to_oxrdf(self) -> OxRdfFormat {
        match self {
            Self::RdfXml => OxRdfFormat::RdfXml,
            Self::Turtle => OxRdfFormat::Turtle,
            Self::NTriples => OxRdfFormat::NTriples,
        }
    }
}

/// Returns the record's subject: its `info:ark` IRI or a fresh blank node.
///
/// When several identifiers carry an ark the last one wins.
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] if the rewritten ark is not a valid IRI.
pub fn record_subject(dc_dict: &MetadataDict) -> Result<NamedOrBlankNode> {
    let ark = dc_dict
        .get("identifier")
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.text_content())
        .filter(|content| content.starts_with(ARK_PREFIX))
        .last();
    match ark {
        Some(ark) => {
            let iri = ark.replace(ARK_PREFIX, INFO_ARK_PREFIX);
            let node = NamedNode::new(iri)
                .map_err(|e| UntlError::ParseError(format!("Invalid ark IRI: {e}")))?;
            Ok(node.into())
        }
        None => Ok(BlankNode::default().into()),
    }
}

fn object(content: &str) -> Term {
    if content.contains("http") && !content.contains(char::is_whitespace) {
        match NamedNode::new(content) {
            Ok(node) => return node.into(),
            Err(e) => trace!(content, error = %e, "URL-like value kept as literal"),
        }
    }
    Literal::new_simple_literal(content).into()
}

/// Builds the `dc:` triples of a DC dictionary, elements in DC order.
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] if the subject or a predicate IRI is invalid.
pub fn dc_dict_to_triples(dc_dict: &MetadataDict) -> Result<Vec<Triple>> {
    let subject = record_subject(dc_dict)?;
    let mut triples = Vec::new();
    for tag in DC_ORDER {
        let Some(entries) = dc_dict.get(*tag) else {
            continue;
        };
        let predicate = NamedNode::new(format!("{DC_NAMESPACE}{tag}"))
            .map_err(|e| UntlError::ParseError(format!("Invalid predicate IRI: {e}")))?;
        for content in entries.iter().filter_map(|entry| entry.text_content()) {
            triples.push(Triple::new(subject.clone(), predicate.clone(), object(content)));
        }
    }
    debug!(triples = triples.len(), "built DC triples");
    Ok(triples)
}

/// Serializes a DC dictionary's triples to `writer` with the `dc` prefix bound.
///
/// # Errors
///
/// Returns [`UntlError::IoError`] if serialization fails.
pub fn write_rdf<W: Write>(dc_dict: &MetadataDict, writer: W, format: RdfFormat) -> Result<()> {
    let triples = dc_dict_to_triples(dc_dict)?;
    let mut serializer = RdfSerializer::from_format(format.to_oxrdf())
        .with_prefix("dc", DC_NAMESPACE)
        .map_err(|e| UntlError::ParseError(format!("Invalid namespace IRI: {e}")))?
        .for_writer(writer);
    for triple in &triples {
        serializer.serialize_triple(triple).map_err(|e| {
            UntlError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
    }
    serializer.finish().map_err(|e| {
        UntlError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    })?;
    Ok(())
}

/// Serializes a DC dictionary in `format`.
///
/// # Errors
///
/// As [`write_rdf`].
pub fn generate_rdf(dc_dict: &MetadataDict, format: RdfFormat) -> Result<String> {
    let mut output = Vec::new();
    write_rdf(dc_dict, &mut output, format)?;
    String::from_utf8(output).map_err(|e| UntlError::ParseError(e.to_string()))
}

/// Serializes a DC dictionary as RDF/XML.
///
/// # Errors
///
/// As [`write_rdf`].
pub fn generate_rdf_xml(dc_dict: &MetadataDict) -> Result<String> {
    generate_rdf(dc_dict, RdfFormat::RdfXml)
}
