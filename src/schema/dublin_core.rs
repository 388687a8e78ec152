//! Simple Dublin Core.

use super::ElementSpec;

/// Canonical order of Dublin Core elements.
pub const DC_ORDER: &[&str] = &[
    "title",
    "creator",
    "contributor",
    "publisher",
    "date",
    "language",
    "description",
    "subject",
    "coverage",
    "source",
    "relation",
    "rights",
    "type",
    "format",
    "identifier",
];

/// OAI-PMH Dublin Core container namespace.
pub const OAI_DC_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/oai_dc/";

/// Dublin Core element namespace.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace declarations written on the `oai_dc:dc` root.
pub const DC_NAMESPACES: &[(Option<&str>, &str)] = &[
    (Some("dc"), DC_NAMESPACE),
    (Some("oai_dc"), OAI_DC_NAMESPACE),
    (Some("xsi"), XSI_NAMESPACE),
];

/// Value of the root `xsi:schemaLocation` attribute.
pub const DC_SCHEMA_LOCATION: &str =
    "http://www.openarchives.org/OAI/2.0/oai_dc/ http://www.openarchives.org/OAI/2.0/oai_dc.xsd";

/// Element descriptors, root first. Dublin Core elements carry text only.
pub const ELEMENTS: &[ElementSpec] = &[
    ElementSpec::leaf("dc")
        .without_content()
        .without_qualifier()
        .with_children(DC_ORDER),
    ElementSpec::leaf("title").without_qualifier(),
    ElementSpec::leaf("creator").without_qualifier(),
    ElementSpec::leaf("contributor").without_qualifier(),
    ElementSpec::leaf("publisher").without_qualifier(),
    ElementSpec::leaf("date").without_qualifier(),
    ElementSpec::leaf("language").without_qualifier(),
    ElementSpec::leaf("description").without_qualifier(),
    ElementSpec::leaf("subject").without_qualifier(),
    ElementSpec::leaf("coverage").without_qualifier(),
    ElementSpec::leaf("source").without_qualifier(),
    ElementSpec::leaf("relation").without_qualifier(),
    ElementSpec::leaf("rights").without_qualifier(),
    ElementSpec::leaf("type").without_qualifier(),
    ElementSpec::leaf("format").without_qualifier(),
    ElementSpec::leaf("identifier").without_qualifier(),
];
