//! Projection of UNTL records onto ETD-MS thesis metadata.

use std::path::Path;

use tracing::{debug, trace};

use crate::dict::{add_empty_fields, tree_to_dict, MetadataDict};
use crate::element::Element;
use crate::error::Result;
use crate::schema::etd_ms::{expand_contributor_role, DEGREE_ORDER};
use crate::schema::Schema;
use crate::xml::{dict_to_xml_file, dict_to_xml_string, XmlOptions};

/// Prefix of identifiers synthesized from a record's ark.
pub const ARK_IDENTIFIER_PREFIX: &str = "http://digital.library.unt.edu/";

/// Projects a UNTL record onto an ETD-MS `thesis` tree.
///
/// Degree parts arrive as separate UNTL `degree` leaves qualified by the
/// part name. They are gathered over the whole record and written as one
/// `degree` element at the end, parts in name, level, discipline, grantor
/// order. Only the first creation date survives.
///
/// # Errors
///
/// Returns an error only if the ETD-MS tables are inconsistent.
pub fn untl_to_etd_ms(untl: &Element) -> Result<Element> {
    let mut thesis = Element::root(Schema::EtdMs);
    let mut degree: [Option<Option<String>>; 4] = Default::default();
    let mut seen_creation = false;

    for element in untl.children() {
        let qualifier = element.qualifier();
        let content = element.content();
        let projected = match element.tag() {
            tag @ ("title" | "coverage" | "language" | "rights") => {
                Some(copy(tag, qualifier, content)?)
            }
            "resourceType" => Some(copy("type", qualifier, content)?),
            tag @ ("creator" | "publisher") => {
                Some(copy(tag, qualifier, Some(agent_name(element)))?)
            }
            "contributor" => match qualifier.and_then(expand_contributor_role) {
                Some(role) => Some(
                    Element::new(Schema::EtdMs, "contributor")?
                        .with_role(role)?
                        .with_content(agent_name(element))?,
                ),
                None => None,
            },
            "description" if qualifier == Some("content") => {
                Some(copy("description", None, content)?)
            }
            "subject" => {
                let mut subject = copy("subject", None, content)?;
                if let Some(scheme) = qualifier.filter(|q| !q.is_empty() && *q != "KWD") {
                    subject.set_scheme(scheme)?;
                }
                Some(subject)
            }
            "identifier" => {
                let text = match (qualifier.filter(|q| !q.is_empty()), content) {
                    (Some(qualifier), Some(text)) => Some(format!("{qualifier}: {text}")),
                    (_, text) => text.map(str::to_string),
                };
                Some(copy("identifier", None, text.as_deref())?)
            }
            "date" if qualifier == Some("creation") => {
                if seen_creation {
                    None
                } else {
                    seen_creation = true;
                    Some(copy("date", None, content)?)
                }
            }
            "degree" => {
                if let Some(slot) = qualifier.and_then(|q| DEGREE_ORDER.iter().position(|part| *part == q)) {
                    degree[slot] = Some(content.map(str::to_string));
                }
                None
            }
            "meta" if qualifier == Some("ark") => ark_identifier(&thesis, content)?,
            _ => None,
        };
        match projected {
            Some(child) => thesis.add_child(child)?,
            None => trace!(tag = element.tag(), qualifier = ?qualifier, "not projected to ETD-MS"),
        }
    }

    if degree.iter().any(Option::is_some) {
        let mut compound = Element::new(Schema::EtdMs, "degree")?;
        for (part, value) in DEGREE_ORDER.iter().zip(degree) {
            let Some(value) = value else {
                continue;
            };
            let mut child = Element::new(Schema::EtdMs, part)?;
            if let Some(text) = value {
                child.set_content(text)?;
            }
            compound.add_child(child)?;
        }
        thesis.add_child(compound)?;
    }

    debug!(
        source = untl.children().len(),
        projected = thesis.children().len(),
        "projected UNTL record to ETD-MS"
    );
    Ok(thesis)
}

fn copy(tag: &str, qualifier: Option<&str>, content: Option<&str>) -> Result<Element> {
    let mut element = Element::new(Schema::EtdMs, tag)?;
    if let Some(qualifier) = qualifier {
        element.set_qualifier(qualifier)?;
    }
    if let Some(content) = content {
        element.set_content(content)?;
    }
    Ok(element)
}

fn agent_name(element: &Element) -> &str {
    element.child_content("name").unwrap_or_default()
}

fn ark_identifier(thesis: &Element, ark: Option<&str>) -> Result<Option<Element>> {
    let Some(ark) = ark.filter(|ark| !ark.is_empty()) else {
        return Ok(None);
    };
    let exists = thesis.children_with_tag("identifier").any(|identifier| {
        identifier
            .content()
            .is_some_and(|text| text.starts_with(ARK_IDENTIFIER_PREFIX))
    });
    if exists {
        return Ok(None);
    }
    let url = format!("{ARK_IDENTIFIER_PREFIX}{ark}");
    Ok(Some(Element::new(Schema::EtdMs, "identifier")?.with_content(url)?))
}

/// Projects a UNTL record and returns the ETD-MS dictionary.
///
/// # Errors
///
/// As [`untl_to_etd_ms`].
pub fn untl_to_etd_ms_dict(untl: &Element) -> Result<MetadataDict> {
    Ok(tree_to_dict(&untl_to_etd_ms(untl)?))
}

/// Writes an ETD-MS dictionary as XML under a `thesis` root.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn generate_etd_ms_xml(etd_ms_dict: &MetadataDict) -> Result<String> {
    dict_to_xml_string(etd_ms_dict, &XmlOptions::etd_ms())
}

/// Writes [`generate_etd_ms_xml`] output to `path`.
///
/// # Errors
///
/// Returns [`UntlError::Generation`](crate::UntlError::Generation) if the
/// file cannot be written.
pub fn write_etd_ms_file(path: impl AsRef<Path>, etd_ms_dict: &MetadataDict) -> Result<()> {
    dict_to_xml_file(path, etd_ms_dict, &XmlOptions::etd_ms())
}

/// Pads an ETD-MS dictionary with blank entries for every missing element.
pub fn add_empty_etd_ms_fields(etd_ms_dict: &mut MetadataDict) {
    add_empty_fields(etd_ms_dict, Schema::EtdMs);
}
