//! Projection of UNTL records onto simple Dublin Core.
//!
//! Each UNTL tag maps to at most one of the fifteen DC elements:
//!
//! | UNTL | DC |
//! |------|----|
//! | title, subject, coverage, source, relation, rights, language, format | same tag |
//! | resourceType | type |
//! | creator, publisher, contributor | same tag, text of the `name` child |
//! | description (`physical`) | format |
//! | description (other) | description |
//! | date (`creation` only) | date |
//! | identifier | identifier, as `"<qualifier>: <content>"` |
//!
//! Anything else (collection, institution, meta, ...) has no DC counterpart
//! and is dropped. Coverage start and end dates are merged into one
//! `"start-end"` value written after everything else. Given an ark and a
//! domain name, a permalink identifier and an `ark:` identifier are added.
//!
//! # Examples
//!
//! ```ignore
//! use untl::dublin_core::{self, DcOptions};
//!
//! let options = DcOptions::default()
//!     .with_ark("ark:/67531/metapth1")
//!     .with_domain_name("digital.library.unt.edu");
//! let dc = dublin_core::untl_to_dc(&record, &options)?;
//! let dc_dict = untl::dict::tree_to_dict(&dc);
//!
//! let xml = dublin_core::generate_dc_xml(&dc_dict)?;
//! let text = dublin_core::generate_dc_text(&dc_dict);
//! # Ok::<(), untl::UntlError>(())
//! ```

use std::path::Path;

use tracing::{debug, trace};

use crate::anvl::write_anvl;
use crate::dict::{dict_to_tree, format_dict, tree_to_dict, FormattedDict, MetadataDict};
use crate::element::Element;
use crate::error::Result;
use crate::json::formatted_to_json;
use crate::schema::dublin_core::DC_ORDER;
use crate::schema::Schema;
use crate::vocabulary::{resolve, Resolution, Vocabularies};
use crate::xml::{dict_to_xml_file, dict_to_xml_string, XmlOptions};

/// Scheme used for permalinks when none is given.
pub const DEFAULT_SCHEME: &str = "http";

/// Options for [`untl_to_dc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcOptions {
    /// Ark of the record, e.g. `ark:/67531/metapth1`.
    pub ark: Option<String>,
    /// Host serving permalinks.
    pub domain_name: Option<String>,
    /// Permalink URL scheme.
    pub scheme: String,
    /// Vocabulary resolution mode.
    pub resolve: Resolution,
    /// Vocabularies used for resolution.
    pub vocabularies: Option<Vocabularies>,
}

impl Default for DcOptions {
    fn default() -> Self {
        Self {
            ark: None,
            domain_name: None,
            scheme: DEFAULT_SCHEME.to_string(),
            resolve: Resolution::Off,
            vocabularies: None,
        }
    }
}

impl DcOptions {
    /// Sets the ark.
    #[must_use]
    pub fn with_ark(mut self, ark: impl Into<String>) -> Self {
        self.ark = Some(ark.into());
        self
    }

    /// Sets the permalink domain.
    #[must_use]
    pub fn with_domain_name(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    /// Sets the permalink scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Resolves vocabulary tokens to labels or URLs using `vocabularies`.
    #[must_use]
    pub fn with_resolution(mut self, resolve: Resolution, vocabularies: Vocabularies) -> Self {
        self.resolve = resolve;
        self.vocabularies = Some(vocabularies);
        self
    }

    fn resolved(&self, dc_tag: &str, qualifier: Option<&str>, content: String) -> String {
        let Some(vocabularies) = &self.vocabularies else {
            return content;
        };
        let Some(vocabulary) = vocabulary_for(dc_tag, qualifier) else {
            return content;
        };
        match resolve(vocabularies, vocabulary, &content, self.resolve) {
            Some(replacement) => replacement.to_string(),
            None => content,
        }
    }

    fn permalink(&self) -> Option<(String, String)> {
        let ark = self.ark.as_deref().filter(|ark| !ark.is_empty())?;
        let domain = self.domain_name.as_deref().filter(|domain| !domain.is_empty())?;
        let scheme = if self.scheme.is_empty() {
            DEFAULT_SCHEME
        } else {
            &self.scheme
        };
        let mut url = format!("{scheme}://{domain}");
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(ark);
        if !url.ends_with('/') {
            url.push('/');
        }
        Some((url, format!("ark: {ark}")))
    }
}

/// Name of the vocabulary that resolves `dc_tag` content carrying the
/// source element's `qualifier`.
#[must_use]
pub fn vocabulary_for(dc_tag: &str, qualifier: Option<&str>) -> Option<&'static str> {
    match (dc_tag, qualifier) {
        ("coverage", Some("timePeriod")) => Some("coverage-eras"),
        ("format", None) => Some("formats"),
        ("language", _) => Some("languages"),
        ("type", _) => Some("resource-types"),
        ("rights", Some("access")) => Some("rights-access"),
        ("rights", Some("license")) => Some("rights-licenses"),
        _ => None,
    }
}

/// Picks the DC tag and content for one UNTL element, or `None` to drop it.
fn project(element: &Element) -> Option<(&'static str, Option<String>)> {
    let qualifier = element.qualifier();
    let content = element.content().map(str::to_string);
    let agent_name = || Some(element.child_content("name").unwrap_or_default().to_string());
    match element.tag() {
        tag @ ("coverage" | "format" | "language" | "subject" | "title" | "source"
        | "relation" | "rights") => Some((tag, content)),
        "resourceType" => Some(("type", content)),
        tag @ ("creator" | "publisher" | "contributor") => Some((tag, agent_name())),
        "description" if qualifier == Some("physical") => Some(("format", content)),
        "description" => Some(("description", content)),
        "date" if qualifier == Some("creation") => Some(("date", content)),
        "identifier" => {
            let content = match qualifier.filter(|qualifier| !qualifier.is_empty()) {
                Some(qualifier) => content.map(|text| format!("{}: {text}", qualifier.to_lowercase())),
                None => content,
            };
            Some(("identifier", content))
        }
        _ => None,
    }
}

/// Projects a UNTL record onto a Dublin Core tree.
///
/// # Errors
///
/// Returns an error only if the DC tables are inconsistent.
pub fn untl_to_dc(untl: &Element, options: &DcOptions) -> Result<Element> {
    let mut dc = Element::root(Schema::DublinCore);
    let mut start_date: Option<String> = None;
    let mut end_date: Option<String> = None;

    for element in untl.children() {
        let Some((dc_tag, content)) = project(element) else {
            trace!(tag = element.tag(), qualifier = ?element.qualifier(), "no Dublin Core mapping");
            continue;
        };
        let content =
            content.map(|text| options.resolved(dc_tag, element.qualifier(), text));
        if dc_tag == "coverage" {
            match element.qualifier() {
                Some("sDate") => {
                    start_date = content;
                    continue;
                }
                Some("eDate") => {
                    end_date = content;
                    continue;
                }
                _ => {}
            }
        }
        let mut child = Element::new(Schema::DublinCore, dc_tag)?;
        if let Some(text) = content {
            child.set_content(text)?;
        }
        dc.add_child(child)?;
    }

    if let Some((permalink, ark)) = options.permalink() {
        dc.add_child(Element::new(Schema::DublinCore, "identifier")?.with_content(permalink)?)?;
        dc.add_child(Element::new(Schema::DublinCore, "identifier")?.with_content(ark)?)?;
    }

    let coverage = match (start_date, end_date) {
        (Some(start), Some(end)) => Some(format!("{start}-{end}")),
        (start, end) => start.or(end),
    };
    if let Some(coverage) = coverage {
        dc.add_child(Element::new(Schema::DublinCore, "coverage")?.with_content(coverage)?)?;
    }

    debug!(
        source = untl.children().len(),
        projected = dc.children().len(),
        "projected UNTL record to Dublin Core"
    );
    Ok(dc)
}

/// Projects a UNTL record and returns the DC dictionary.
///
/// # Errors
///
/// As [`untl_to_dc`].
pub fn untl_to_dc_dict(untl: &Element, options: &DcOptions) -> Result<MetadataDict> {
    Ok(tree_to_dict(&untl_to_dc(untl, options)?))
}

/// Projects a UNTL dictionary and flattens the DC result to tag → values.
///
/// # Errors
///
/// Returns an error if `untl_dict` does not fit the UNTL schema.
pub fn untl_dict_to_dc_formatted(
    untl_dict: &MetadataDict,
    options: &DcOptions,
) -> Result<FormattedDict> {
    let untl = dict_to_tree(untl_dict, Schema::Untl)?;
    Ok(format_dict(&untl_to_dc_dict(&untl, options)?))
}

/// Writes a DC dictionary as OAI Dublin Core XML.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn generate_dc_xml(dc_dict: &MetadataDict) -> Result<String> {
    dict_to_xml_string(dc_dict, &XmlOptions::dublin_core())
}

/// Writes a DC dictionary as sorted, four-space indented JSON of tag → values.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn generate_dc_json(dc_dict: &MetadataDict) -> Result<String> {
    formatted_to_json(&format_dict(dc_dict))
}

/// Writes a DC dictionary as ANVL text in DC order.
#[must_use]
pub fn generate_dc_text(dc_dict: &MetadataDict) -> String {
    write_anvl(dc_dict, DC_ORDER)
}

/// Writes [`generate_dc_xml`] output to `path`.
///
/// # Errors
///
/// Returns [`UntlError::Generation`](crate::UntlError::Generation) if the
/// file cannot be written.
pub fn write_dc_file(path: impl AsRef<Path>, dc_dict: &MetadataDict) -> Result<()> {
    dict_to_xml_file(path, dc_dict, &XmlOptions::dublin_core())
}
