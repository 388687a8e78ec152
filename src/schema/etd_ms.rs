//! ETD-MS, the metadata standard for electronic theses and dissertations.

use super::ElementSpec;

/// Canonical order of ETD-MS elements.
pub const ETD_MS_ORDER: &[&str] = &[
    "title",
    "creator",
    "subject",
    "description",
    "publisher",
    "contributor",
    "date",
    "type",
    "identifier",
    "language",
    "coverage",
    "rights",
    "degree",
];

/// Fixed order of the children of `degree`.
pub const DEGREE_ORDER: &[&str] = &["name", "level", "discipline", "grantor"];

/// Default namespace of an ETD-MS document.
pub const ETD_MS_NAMESPACE: &str = "http://www.ndltd.org/standards/metadata/etdms/1.0/";

/// Namespace declarations written on the `thesis` root.
pub const ETD_MS_NAMESPACES: &[(Option<&str>, &str)] = &[
    (None, ETD_MS_NAMESPACE),
    (
        Some("xsi"),
        "http://www.ndltd.org/standards/metadata/etdms/1.0/etdms.xsd/",
    ),
];

/// Short contributor role codes and the labels ETD-MS uses for them.
pub const CONTRIBUTOR_ROLES: &[(&str, &str)] = &[
    ("ths", "advisor"),
    ("cmr", "committee member"),
    ("cha", "chair"),
    ("jrr", "juror"),
];

/// Expands a contributor role code, or `None` for codes ETD-MS does not use.
#[must_use]
pub fn expand_contributor_role(code: &str) -> Option<&'static str> {
    CONTRIBUTOR_ROLES
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, label)| *label)
}

/// Element descriptors, root first.
pub const ELEMENTS: &[ElementSpec] = &[
    ElementSpec::leaf("thesis")
        .without_content()
        .without_qualifier()
        .with_children(ETD_MS_ORDER),
    ElementSpec::leaf("title"),
    ElementSpec::leaf("creator"),
    ElementSpec::leaf("subject").without_qualifier().with_scheme(),
    ElementSpec::leaf("description").without_qualifier(),
    ElementSpec::leaf("publisher"),
    ElementSpec::leaf("contributor").without_qualifier().with_role(),
    ElementSpec::leaf("date").without_qualifier(),
    ElementSpec::leaf("type"),
    ElementSpec::leaf("identifier").without_qualifier(),
    ElementSpec::leaf("language"),
    ElementSpec::leaf("coverage"),
    ElementSpec::leaf("rights"),
    ElementSpec::leaf("degree")
        .without_content()
        .without_qualifier()
        .with_children(DEGREE_ORDER),
    ElementSpec::leaf("name").without_qualifier(),
    ElementSpec::leaf("level").without_qualifier(),
    ElementSpec::leaf("discipline").without_qualifier(),
    ElementSpec::leaf("grantor").without_qualifier(),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_contributor_role() {
        assert_eq!(expand_contributor_role("ths"), Some("advisor"));
        assert_eq!(expand_contributor_role("cha"), Some("chair"));
        assert_eq!(expand_contributor_role("aut"), None);
    }
}
