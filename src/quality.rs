//! Record quality measures: completeness, missing qualifiers and size.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::dict::{tree_to_dict, MetadataDict};
use crate::element::Element;
use crate::error::Result;
use crate::json::dict_to_json;
use crate::schema::untl::REQUIRES_QUALIFIER;

/// Scored UNTL elements and their weights.
pub const COMPLETENESS_WEIGHTS: &[(&str, u32)] = &[
    ("title", 10),
    ("description", 1),
    ("language", 1),
    ("collection", 10),
    ("institution", 10),
    ("resourceType", 5),
    ("format", 1),
    ("subject", 1),
    ("meta", 20),
];

/// Legacy template text standing in for missing content.
pub const PLACEHOLDER_VALUES: &[&str] = &[
    "change as necessary",
    "change template values when appropriate",
];

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Regex =
        Regex::new(r"\{\{\{.*\}\}\}").expect("placeholder pattern is valid");
}

fn is_real_content(content: &str) -> bool {
    let lowered = content.to_lowercase();
    !content.is_empty()
        && !PLACEHOLDER_VALUES.contains(&lowered.as_str())
        && !PLACEHOLDER_PATTERN.is_match(&lowered)
}

fn is_present(element: &Element) -> bool {
    if element.tag() == "meta" && element.qualifier() != Some("system") {
        return false;
    }
    if element.has_children() {
        element
            .children()
            .iter()
            .filter_map(Element::content)
            .any(is_real_content)
    } else {
        element.content().is_some_and(is_real_content)
    }
}

/// Scores how completely a UNTL record is described, from 0.0 to 1.0.
///
/// Each scored element contributes its weight once when at least one
/// instance carries real content. `meta` only counts with the `system`
/// qualifier.
#[must_use]
pub fn completeness(untl: &Element) -> f64 {
    let total: u32 = COMPLETENESS_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    let score: u32 = COMPLETENESS_WEIGHTS
        .iter()
        .filter(|(tag, _)| untl.children_with_tag(tag).any(is_present))
        .map(|(_, weight)| weight)
        .sum();
    f64::from(score) / f64::from(total)
}

/// A qualifier problem found by [`find_untl_errors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierError {
    /// An entry of a qualifier-requiring element has none.
    NoQualifier,
}

/// Result of [`find_untl_errors`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualifierReport {
    /// The checked dictionary, fixed when requested.
    pub dict: MetadataDict,
    /// Tag → problem.
    pub errors: BTreeMap<String, QualifierError>,
}

impl QualifierReport {
    /// Returns `true` when no problem was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Finds entries of qualifier-requiring elements that lack a qualifier.
///
/// With `fix`, each such entry receives an empty qualifier so the record
/// can be written as valid UNTL.
#[must_use]
pub fn find_untl_errors(mut dict: MetadataDict, fix: bool) -> QualifierReport {
    let mut errors = BTreeMap::new();
    for tag in REQUIRES_QUALIFIER {
        let Some(entries) = dict.get_mut(*tag) else {
            continue;
        };
        for entry in entries.iter_mut().filter(|entry| entry.qualifier.is_none()) {
            errors.insert((*tag).to_string(), QualifierError::NoQualifier);
            if fix {
                entry.qualifier = Some(String::new());
            }
        }
    }
    if !errors.is_empty() {
        trace!(tags = ?errors.keys().collect::<Vec<_>>(), fixed = fix, "missing qualifiers");
    }
    QualifierReport { dict, errors }
}

/// Size of a record as the character count of its compact JSON form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn record_length(untl: &Element) -> Result<usize> {
    Ok(dict_to_json(&tree_to_dict(untl), None)?.chars().count())
}

/// [`record_length`] without the `meta` administrative fields.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn record_content_length(untl: &Element) -> Result<usize> {
    let mut dict = tree_to_dict(untl);
    dict.shift_remove("meta");
    Ok(dict_to_json(&dict, None)?.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{dict_to_tree, Entry};
    use crate::schema::Schema;

    fn record(entries: &[(&str, Entry)]) -> Element {
        let mut dict = MetadataDict::new();
        for (tag, entry) in entries {
            dict.entry((*tag).to_string()).or_default().push(entry.clone());
        }
        dict_to_tree(&dict, Schema::Untl).unwrap()
    }

    #[test]
    fn test_completeness_empty_and_full() {
        assert_eq!(completeness(&Element::root(Schema::Untl)), 0.0);
        let full = record(&[
            ("title", Entry::text("Tres Actos").with_qualifier("officialtitle")),
            ("description", Entry::text("A play.").with_qualifier("content")),
            ("language", Entry::text("spa")),
            ("collection", Entry::text("UNT")),
            ("institution", Entry::text("UNT")),
            ("resourceType", Entry::text("text_book")),
            ("format", Entry::text("text")),
            ("subject", Entry::text("Plays").with_qualifier("KWD")),
            ("meta", Entry::text("DC").with_qualifier("system")),
        ]);
        assert!((completeness(&full) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completeness_placeholders_ignored() {
        let untl = record(&[
            ("title", Entry::text("Change As Necessary").with_qualifier("officialtitle")),
            ("collection", Entry::text("{{{collection}}}")),
            ("institution", Entry::text("UNT")),
            ("meta", Entry::text("2011-01-01").with_qualifier("metadataCreationDate")),
        ]);
        assert!((completeness(&untl) - 10.0 / 59.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_untl_errors_and_fix() {
        let mut dict = MetadataDict::new();
        dict.insert(
            "title".to_string(),
            vec![Entry::text("Tres Actos"), Entry::text("Three Acts").with_qualifier("alternatetitle")],
        );
        dict.insert("collection".to_string(), vec![Entry::text("UNT")]);

        let report = find_untl_errors(dict.clone(), false);
        assert_eq!(report.errors.get("title"), Some(&QualifierError::NoQualifier));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.dict, dict);

        let fixed = find_untl_errors(dict, true);
        assert_eq!(fixed.dict["title"][0].qualifier.as_deref(), Some(""));
        assert!(find_untl_errors(fixed.dict, false).is_valid());
    }

    #[test]
    fn test_record_lengths() {
        let untl = record(&[
            ("collection", Entry::text("UNT")),
            ("meta", Entry::text("DC").with_qualifier("system")),
        ]);
        let content = r#"{"collection": [{"content": "UNT"}]}"#;
        assert_eq!(record_content_length(&untl).unwrap(), content.len());
        assert!(record_length(&untl).unwrap() > content.len());
    }
}
