//! Highwire Press citation meta tags.
//!
//! Highwire output is a flat list of `<meta name=".." content=".."/>`
//! entries rather than a tree, so the names themselves form the vocabulary.

use std::fmt;

use super::ElementSpec;

/// Canonical order of Highwire citation names.
pub const HIGHWIRE_ORDER: &[&str] = &[
    "citation_title",
    "citation_author",
    "citation_publisher",
    "citation_publication_date",
    "citation_online_date",
    "citation_journal_title",
    "citation_conference_title",
    "citation_issn",
    "citation_isbn",
    "citation_doi",
    "citation_volume",
    "citation_issue",
    "citation_firstpage",
    "citation_lastpage",
    "citation_dissertation_insitution",
    "citation_technical_report_insitution",
    "citation_technical_report_number",
];

/// Element descriptors, root first.
pub const ELEMENTS: &[ElementSpec] = &[
    ElementSpec::leaf("metadata")
        .without_content()
        .without_qualifier()
        .with_children(&["meta"]),
    ElementSpec::leaf("meta").without_qualifier(),
];

/// A Highwire citation name.
///
/// Variants are declared in [`HIGHWIRE_ORDER`] order, so sorting by the
/// derived `Ord` yields canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighwireName {
    /// `citation_title`
    Title,
    /// `citation_author`
    Author,
    /// `citation_publisher`
    Publisher,
    /// `citation_publication_date`
    PublicationDate,
    /// `citation_online_date`
    OnlineDate,
    /// `citation_journal_title`
    JournalTitle,
    /// `citation_conference_title`
    ConferenceTitle,
    /// `citation_issn`
    Issn,
    /// `citation_isbn`
    Isbn,
    /// `citation_doi`
    Doi,
    /// `citation_volume`
    Volume,
    /// `citation_issue`
    Issue,
    /// `citation_firstpage`
    FirstPage,
    /// `citation_lastpage`
    LastPage,
    /// `citation_dissertation_insitution`
    DissertationInstitution,
    /// `citation_technical_report_insitution`
    TechnicalReportInstitution,
    /// `citation_technical_report_number`
    TechnicalReportNumber,
}

impl HighwireName {
    /// Returns the meta tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        HIGHWIRE_ORDER[self as usize]
    }
}

impl fmt::Display for HighwireName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_order_table() {
        assert_eq!(HighwireName::Title.as_str(), "citation_title");
        assert_eq!(HighwireName::Doi.as_str(), "citation_doi");
        assert_eq!(
            HighwireName::TechnicalReportNumber.as_str(),
            "citation_technical_report_number"
        );
        assert!(HighwireName::Title < HighwireName::Author);
    }
}
