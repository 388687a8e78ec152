//! The native UNTL schema.

use super::ElementSpec;

/// Canonical order of top-level UNTL elements in serialized output.
pub const UNTL_XML_ORDER: &[&str] = &[
    "title",
    "creator",
    "contributor",
    "publisher",
    "date",
    "language",
    "description",
    "subject",
    "primarySource",
    "coverage",
    "source",
    "citation",
    "relation",
    "collection",
    "institution",
    "rights",
    "resourceType",
    "format",
    "identifier",
    "degree",
    "note",
    "meta",
];

/// Elements that are invalid without a qualifier.
pub const REQUIRES_QUALIFIER: &[&str] = &[
    "title",
    "date",
    "description",
    "subject",
    "coverage",
    "citation",
    "rights",
    "identifier",
    "degree",
    "note",
];

/// Namespace URI used when UNTL XML is written with prefixes.
pub const UNTL_NAMESPACE: &str = "http://digital2.library.unt.edu/untl/";

/// Prefix bound to [`UNTL_NAMESPACE`].
pub const UNTL_PREFIX: &str = "untl";

/// Location of the controlled-vocabulary service.
pub const VOCABULARIES_URL: &str = "http://digital2.library.unt.edu/vocabularies/all/";

/// Human-readable documentation of UNTL usage.
pub const UNTL_USAGE_LINK: &str = "http://www.library.unt.edu/digital-projects-unit/";

const AGENT_CHILDREN: &[&str] = &["info", "type", "name"];
const PUBLISHER_CHILDREN: &[&str] = &["info", "name", "location"];

/// Element descriptors, root first.
pub const ELEMENTS: &[ElementSpec] = &[
    ElementSpec::leaf("metadata")
        .without_content()
        .without_qualifier()
        .with_children(UNTL_XML_ORDER),
    ElementSpec::leaf("title"),
    ElementSpec::leaf("identifier"),
    ElementSpec::leaf("note"),
    ElementSpec::leaf("institution").without_qualifier(),
    ElementSpec::leaf("collection").without_qualifier(),
    ElementSpec::leaf("subject"),
    ElementSpec::leaf("creator")
        .without_content()
        .with_children(AGENT_CHILDREN),
    ElementSpec::leaf("primarySource").without_qualifier(),
    ElementSpec::leaf("description"),
    ElementSpec::leaf("date"),
    ElementSpec::leaf("publisher")
        .without_content()
        .without_qualifier()
        .with_children(PUBLISHER_CHILDREN),
    ElementSpec::leaf("contributor")
        .without_content()
        .with_children(AGENT_CHILDREN),
    ElementSpec::leaf("source"),
    ElementSpec::leaf("language").without_qualifier(),
    ElementSpec::leaf("coverage"),
    ElementSpec::leaf("resourceType").without_qualifier(),
    ElementSpec::leaf("relation"),
    ElementSpec::leaf("format").without_qualifier(),
    ElementSpec::leaf("rights"),
    ElementSpec::leaf("degree"),
    ElementSpec::leaf("meta"),
    ElementSpec::leaf("citation"),
    ElementSpec::leaf("info").without_qualifier(),
    ElementSpec::leaf("type").without_qualifier(),
    ElementSpec::leaf("name").without_qualifier(),
    ElementSpec::leaf("location").without_qualifier(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn test_agent_elements_are_compound() {
        let creator = Schema::Untl.element_spec("creator").unwrap();
        assert!(!creator.allows_content);
        assert!(creator.allows_qualifier);
        assert!(creator.allows_child("name"));
        assert!(!creator.allows_child("location"));

        let publisher = Schema::Untl.element_spec("publisher").unwrap();
        assert!(!publisher.allows_qualifier);
        assert!(publisher.allows_child("location"));
    }

    #[test]
    fn test_unqualified_leaves() {
        for tag in ["institution", "collection", "language", "format", "name"] {
            let spec = Schema::Untl.element_spec(tag).unwrap();
            assert!(spec.allows_content);
            assert!(!spec.allows_qualifier, "{tag} should not take a qualifier");
        }
    }
}
