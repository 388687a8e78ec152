#![warn(missing_docs)]

//! # untl: UNTL metadata toolkit
//!
//! Reads, writes and converts UNTL descriptive metadata records. A record is
//! an [`Element`] tree whose tags and capabilities come from a static
//! [`Schema`] registry. The tree converts to and from a [`MetadataDict`],
//! which is the interchange form for every other representation.
//!
//! ## Quick Start
//!
//! ### Reading a UNTL record
//!
//! ```ignore
//! use untl::{xml, dict, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = xml::xml_file_to_tree("record.untl.xml", Schema::Untl)?;
//! let metadata = dict::tree_to_dict(&record);
//!
//! for entry in &metadata["title"] {
//!     println!("{:?}: {:?}", entry.qualifier, entry.text_content());
//! }
//! println!("completeness: {:.2}", record.completeness());
//! # Ok(())
//! # }
//! ```
//!
//! ### Projecting to Dublin Core
//!
//! ```ignore
//! use untl::dublin_core::{generate_dc_xml, untl_to_dc_dict, DcOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let record = untl::Element::root(untl::Schema::Untl);
//! let options = DcOptions::default()
//!     .with_ark("ark:/67531/metadc12345")
//!     .with_domain_name("digital.library.unt.edu");
//! let dc = untl_to_dc_dict(&record, &options)?;
//! println!("{}", generate_dc_xml(&dc)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: tag registries for UNTL, Dublin Core, ETD-MS and Highwire
//! - [`element`]: the schema-checked element tree
//! - [`dict`]: tree ↔ dictionary conversion and blank-field padding
//! - [`form_post`]: dictionaries rebuilt from web-form submissions
//! - [`xml`], [`anvl`], [`json`]: document codecs
//! - [`dublin_core`], [`etd_ms`], [`highwire`]: cross-schema projections
//! - [`rdf`]: RDF export of Dublin Core dictionaries (feature `rdf`)
//! - [`vocabulary`]: controlled-vocabulary lookup
//! - [`quality`], [`version`]: completeness, qualifier checks and fingerprints
//! - [`normalize`]: subject heading normalization
//! - [`batch`]: parallel conversion of many records
//! - [`error`]: error types and result type

pub mod anvl;
pub mod batch;
pub mod dict;
pub mod dublin_core;
pub mod element;
pub mod error;
pub mod etd_ms;
pub mod form_post;
pub mod highwire;
pub mod json;
pub mod normalize;
pub mod quality;
#[cfg(feature = "rdf")]
pub mod rdf;
pub mod schema;
pub mod version;
pub mod vocabulary;
pub mod xml;

pub use dict::{Content, Entry, FormattedDict, MetadataDict};
pub use dublin_core::DcOptions;
pub use element::Element;
pub use error::{Result, UntlError};
pub use highwire::{HighwireElement, HighwireOptions};
pub use schema::{ElementSpec, Schema};
pub use version::HashOptions;
pub use vocabulary::{Resolution, Vocabularies, VocabularySource};
pub use xml::XmlOptions;
