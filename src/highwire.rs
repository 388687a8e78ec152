//! Highwire Press citation tags derived from UNTL records.
//!
//! Highwire output is a flat list of `citation_*` name/content pairs meant
//! for HTML `<meta>` tags. At most one title, one publisher and one
//! publication date are taken from a record, and the title always comes
//! last in the list.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::anvl::write_anvl;
use crate::dict::{Entry, MetadataDict};
use crate::element::Element;
use crate::error::Result;
use crate::json::to_json_string;
use crate::json::FORMATTED_INDENT;
use crate::schema::highwire::{HighwireName, HIGHWIRE_ORDER};
use crate::xml::{DocumentWriter, Escaping};

lazy_static! {
    static ref CREATION_DATE: Regex =
        Regex::new(r"^([0-9]{4})[- /.](0[1-9]|1[012])[- /.](0[1-9]|[12][0-9]|3[01])$")
            .expect("creation date pattern is valid");
    static ref CREATION_MONTH: Regex = Regex::new(r"^([0-9]{4})[- /.](0[1-9]|1[012])$")
        .expect("creation month pattern is valid");
    static ref CREATION_YEAR: Regex =
        Regex::new(r"^([0-9]{4})").expect("creation year pattern is valid");
    static ref META_CREATION_DATE: Regex =
        Regex::new(r"^([0-9]{4})[- /.](0[1-9]|1[012])[- /.](0[1-9]|[12][0-9]|3[01])")
            .expect("metadata creation date pattern is valid");
}

/// One citation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighwireElement {
    /// Citation name.
    pub name: HighwireName,
    /// Qualifier of the UNTL element it came from, where one was kept.
    pub qualifier: Option<String>,
    /// Tag content.
    pub content: String,
}

/// Options for [`untl_to_highwire`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighwireOptions {
    /// HTML-escape content and write non-ASCII characters as `&#N;`.
    pub escape: bool,
}

impl HighwireOptions {
    /// Enables or disables escaping.
    #[must_use]
    pub const fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    fn element(&self, name: HighwireName, qualifier: Option<&str>, content: &str) -> HighwireElement {
        let content = if self.escape {
            escape_html(content)
        } else {
            content.to_string()
        };
        HighwireElement {
            name,
            qualifier: qualifier.map(str::to_string),
            content,
        }
    }
}

/// Escapes `& < > "` and writes non-ASCII characters as numeric references.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if c.is_ascii() => out.push(c),
            c => {
                let _ = write!(out, "&#{};", u32::from(c));
            }
        }
    }
    out
}

fn calendar_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Reformats a creation date for `citation_publication_date`.
///
/// `YYYY-MM-DD` becomes `MM/DD/YYYY` and `YYYY-MM` becomes `MM/YYYY`; the
/// separator may be `-`, space, `/` or `.`. Anything else starting with four
/// digits yields those digits. Impossible dates yield `None`.
#[must_use]
pub fn publication_date(text: &str) -> Option<String> {
    if let Some(caps) = CREATION_DATE.captures(text) {
        let date = calendar_date(&caps[1], &caps[2], &caps[3])?;
        return Some(format!("{:02}/{:02}/{}", date.month(), date.day(), date.year()));
    }
    if let Some(caps) = CREATION_MONTH.captures(text) {
        let date = calendar_date(&caps[1], &caps[2], "1")?;
        return Some(format!("{:02}/{}", date.month(), date.year()));
    }
    CREATION_YEAR.captures(text).map(|caps| caps[1].to_string())
}

/// Reformats a metadata creation date for `citation_online_date`.
#[must_use]
pub fn online_date(text: &str) -> Option<String> {
    let caps = META_CREATION_DATE.captures(text)?;
    let date = calendar_date(&caps[1], &caps[2], &caps[3])?;
    Some(format!("{:02}/{:02}/{}", date.month(), date.day(), date.year()))
}

fn citation_name(qualifier: Option<&str>) -> Option<HighwireName> {
    match qualifier? {
        "publicationTitle" => Some(HighwireName::JournalTitle),
        "volume" => Some(HighwireName::Volume),
        "issue" => Some(HighwireName::Issue),
        "pageStart" => Some(HighwireName::FirstPage),
        "pageEnd" => Some(HighwireName::LastPage),
        _ => None,
    }
}

fn identifier_name(qualifier: Option<&str>) -> Option<HighwireName> {
    match qualifier? {
        "ISBN" => Some(HighwireName::Isbn),
        "ISSN" => Some(HighwireName::Issn),
        "DOI" => Some(HighwireName::Doi),
        "REP-NO" => Some(HighwireName::TechnicalReportNumber),
        _ => None,
    }
}

fn author_name(creator: &Element) -> Option<&str> {
    if creator.qualifier() != Some("aut") {
        return None;
    }
    let is_person = creator
        .children_with_tag("type")
        .any(|child| child.content() == Some("per"));
    let name = creator
        .children_with_tag("name")
        .filter_map(Element::content)
        .last()
        .filter(|name| !name.is_empty());
    if is_person {
        name
    } else {
        None
    }
}

/// Builds the citation tags of a UNTL record.
#[must_use]
pub fn untl_to_highwire(untl: &Element, options: &HighwireOptions) -> Vec<HighwireElement> {
    let mut elements = Vec::new();
    let mut title: Option<HighwireElement> = None;
    let mut has_publisher = false;
    let mut has_creation = false;

    for element in untl.children() {
        let qualifier = element.qualifier();
        let content = element.content().filter(|text| !text.is_empty());
        match element.tag() {
            "title" => {
                if let Some(text) = content {
                    if qualifier == Some("officialtitle") || title.is_none() {
                        title = Some(options.element(HighwireName::Title, qualifier, text));
                    }
                }
            }
            "creator" => {
                if let Some(name) = author_name(element) {
                    elements.push(options.element(HighwireName::Author, qualifier, name));
                }
            }
            "publisher" if !has_publisher => {
                if let Some(name) = element.child_content("name").filter(|name| !name.is_empty()) {
                    elements.push(options.element(HighwireName::Publisher, qualifier, name));
                    has_publisher = true;
                }
            }
            "date" if !has_creation && qualifier == Some("creation") => {
                if let Some(date) = content.and_then(publication_date) {
                    elements.push(options.element(HighwireName::PublicationDate, qualifier, &date));
                    has_creation = true;
                }
            }
            "meta" if qualifier == Some("metadataCreationDate") => {
                if let Some(date) = content.and_then(online_date) {
                    elements.push(options.element(HighwireName::OnlineDate, qualifier, &date));
                }
            }
            "citation" => {
                if let (Some(name), Some(text)) = (citation_name(qualifier), content) {
                    elements.push(options.element(name, None, text));
                }
            }
            "identifier" => {
                if let (Some(name), Some(text)) = (identifier_name(qualifier), content) {
                    elements.push(options.element(name, None, text));
                }
            }
            "degree" if qualifier == Some("grantor") => {
                if let Some(text) = content {
                    elements.push(options.element(
                        HighwireName::DissertationInstitution,
                        qualifier,
                        text,
                    ));
                }
            }
            tag => trace!(tag, qualifier = ?qualifier, "no Highwire mapping"),
        }
    }
    if let Some(title) = title {
        elements.push(title);
    }
    debug!(tags = elements.len(), "built Highwire citation tags");
    elements
}

/// Groups the tags by name as `{name: [{"content": ..}]}`.
#[must_use]
pub fn highwire_to_dict(elements: &[HighwireElement]) -> MetadataDict {
    let mut dict = MetadataDict::new();
    for element in elements {
        dict.entry(element.name.as_str().to_string())
            .or_default()
            .push(Entry::text(element.content.clone()));
    }
    dict
}

/// Writes `<metadata>` with one `<meta name=".." content=".."/>` per tag,
/// in Highwire order.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn generate_highwire_xml(elements: &[HighwireElement]) -> Result<String> {
    let mut sorted: Vec<&HighwireElement> = elements.iter().collect();
    sorted.sort_by_key(|element| element.name);

    let mut document = DocumentWriter::new(Escaping::Utf8)?;
    if sorted.is_empty() {
        document.empty::<&str, &str>("metadata", &[])?;
    } else {
        document.start::<&str, &str>("metadata", &[])?;
        for element in sorted {
            document.empty(
                "meta",
                &[("name", element.name.as_str()), ("content", element.content.as_str())],
            )?;
        }
        document.end("metadata")?;
    }
    document.finish()
}

/// Writes the tags as sorted, four-space indented JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn generate_highwire_json(elements: &[HighwireElement]) -> Result<String> {
    to_json_string(&highwire_to_dict(elements), Some(FORMATTED_INDENT))
}

/// Writes the tags as ANVL text in Highwire order.
#[must_use]
pub fn generate_highwire_text(elements: &[HighwireElement]) -> String {
    write_anvl(&highwire_to_dict(elements), HIGHWIRE_ORDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::dict_to_tree;
    use crate::schema::Schema;

    fn untl(entries: &[(&str, Entry)]) -> Element {
        let mut dict = MetadataDict::new();
        for (tag, entry) in entries {
            dict.entry((*tag).to_string()).or_default().push(entry.clone());
        }
        dict_to_tree(&dict, Schema::Untl).unwrap()
    }

    fn tres_actos() -> Element {
        untl(&[
            ("title", Entry::text("Tres Actos").with_qualifier("officialtitle")),
            (
                "creator",
                Entry::children([("name", "Last, Furston, 1807-1865."), ("type", "per")])
                    .with_qualifier("aut"),
            ),
            ("publisher", Entry::children([("name", "Fake Publishing")])),
            ("collection", Entry::text("UNT")),
            ("date", Entry::text("1944").with_qualifier("creation")),
        ])
    }

    #[test]
    fn test_untl_to_highwire_title_last() {
        let elements = untl_to_highwire(&tres_actos(), &HighwireOptions::default());
        let names: Vec<_> = elements.iter().map(|element| element.name).collect();
        assert_eq!(
            names,
            [
                HighwireName::Author,
                HighwireName::Publisher,
                HighwireName::PublicationDate,
                HighwireName::Title,
            ]
        );
        assert_eq!(elements[0].qualifier.as_deref(), Some("aut"));
        assert_eq!(elements[1].qualifier, None);
        assert_eq!(elements[2].content, "1944");
        assert_eq!(elements[2].qualifier.as_deref(), Some("creation"));
    }

    #[test]
    fn test_officialtitle_preferred() {
        let record = untl(&[
            ("title", Entry::text("Series").with_qualifier("seriestitle")),
            ("title", Entry::text("Official").with_qualifier("officialtitle")),
            ("title", Entry::text("Later").with_qualifier("addedtitle")),
        ]);
        let elements = untl_to_highwire(&record, &HighwireOptions::default());
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].content, "Official");
    }

    #[test]
    fn test_author_requires_person_and_aut() {
        let record = untl(&[
            (
                "creator",
                Entry::children([("name", "UNT"), ("type", "org")]).with_qualifier("aut"),
            ),
            (
                "creator",
                Entry::children([("name", "Case, Justin"), ("type", "per")]).with_qualifier("ill"),
            ),
        ]);
        assert!(untl_to_highwire(&record, &HighwireOptions::default()).is_empty());
    }

    #[test]
    fn test_publication_date_formats() {
        assert_eq!(publication_date("2004-03-09").as_deref(), Some("03/09/2004"));
        assert_eq!(publication_date("2004.11.20").as_deref(), Some("11/20/2004"));
        assert_eq!(publication_date("2004 03").as_deref(), Some("03/2004"));
        assert_eq!(publication_date("1944").as_deref(), Some("1944"));
        assert_eq!(publication_date("1944?").as_deref(), Some("1944"));
        assert_eq!(publication_date("2003-02-30"), None);
        assert_eq!(publication_date("[194-]"), None);
        assert_eq!(publication_date("0000-01-01"), None);
    }

    #[test]
    fn test_first_valid_creation_date_wins() {
        let record = untl(&[
            ("date", Entry::text("unknown").with_qualifier("creation")),
            ("date", Entry::text("1999-12").with_qualifier("creation")),
            ("date", Entry::text("2001").with_qualifier("creation")),
        ]);
        let elements = untl_to_highwire(&record, &HighwireOptions::default());
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].content, "12/1999");
    }

    #[test]
    fn test_qualifier_directed_names() {
        let record = untl(&[
            ("citation", Entry::text("Journal of Tests").with_qualifier("publicationTitle")),
            ("citation", Entry::text("12").with_qualifier("volume")),
            ("citation", Entry::text("x").with_qualifier("place")),
            ("identifier", Entry::text("10.1000/xyz").with_qualifier("DOI")),
            ("identifier", Entry::text("1234").with_qualifier("LCCN")),
            ("degree", Entry::text("UNT").with_qualifier("grantor")),
            ("meta", Entry::text("2012-05-07, 10:00").with_qualifier("metadataCreationDate")),
        ]);
        let elements = untl_to_highwire(&record, &HighwireOptions::default());
        let pairs: Vec<_> = elements
            .iter()
            .map(|element| (element.name.as_str(), element.content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("citation_journal_title", "Journal of Tests"),
                ("citation_volume", "12"),
                ("citation_doi", "10.1000/xyz"),
                ("citation_dissertation_insitution", "UNT"),
                ("citation_online_date", "05/07/2012"),
            ]
        );
    }

    #[test]
    fn test_escape() {
        let record = untl(&[("title", Entry::text("A & \"B\" caf\u{e9}").with_qualifier("officialtitle"))]);
        let elements = untl_to_highwire(&record, &HighwireOptions::default().with_escape(true));
        assert_eq!(elements[0].content, "A &amp; &quot;B&quot; caf&#233;");
    }

    #[test]
    fn test_generate_highwire_outputs() {
        let elements = untl_to_highwire(&tres_actos(), &HighwireOptions::default());
        let xml = generate_highwire_xml(&elements).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<metadata>
  <meta name=\"citation_title\" content=\"Tres Actos\"/>
  <meta name=\"citation_author\" content=\"Last, Furston, 1807-1865.\"/>
  <meta name=\"citation_publisher\" content=\"Fake Publishing\"/>
  <meta name=\"citation_publication_date\" content=\"1944\"/>
</metadata>
";
        assert_eq!(xml, expected);

        let text = generate_highwire_text(&elements);
        assert!(text.starts_with("citation_title: Tres Actos\n"));

        let json = generate_highwire_json(&elements).unwrap();
        assert!(json.contains("\"citation_author\": [\n        {\n            \"content\": \"Last, Furston, 1807-1865.\"\n        }\n    ]"));
    }
}
