//! Rebuilding records from flattened web-form submissions.
//!
//! An editing form posts one list of values per `tag-attribute` key, e.g.
//! `title-content` and `title-qualifier`. The n-th values of every key of a
//! tag together describe the n-th occurrence of that tag.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::dict::{tree_to_element_dict, MetadataDict};
use crate::element::Element;
use crate::error::{Result, UntlError};
use crate::schema::Schema;

/// Form data: key → submitted values.
pub type FormPost = IndexMap<String, Vec<String>>;

/// Attribute that sets the qualifier of a compound parent.
pub const ROLE_ATTRIBUTE: &str = "role";

/// Builds a UNTL dictionary from posted form data.
///
/// Keys listed in `ignore` are skipped. `content` and `qualifier` values set
/// those fields, a non-empty `role` sets the qualifier, and any other
/// non-empty value becomes a child element named after the attribute. An
/// occurrence with no content, qualifier or children is dropped.
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] for a key without `-`,
/// [`UntlError::NumericMismatch`] when a tag's value lists differ in length,
/// and schema errors when a tag or child is not valid UNTL.
pub fn post_to_dict(post: &FormPost, ignore: &[&str]) -> Result<MetadataDict> {
    let mut fields: IndexMap<&str, Vec<(&str, &[String])>> = IndexMap::new();
    for (key, values) in post {
        if ignore.contains(&key.as_str()) {
            continue;
        }
        let (tag, attribute) = key.split_once('-').ok_or_else(|| {
            UntlError::ParseError(format!("Form key \"{key}\" is not of the form tag-attribute"))
        })?;
        fields
            .entry(tag)
            .or_default()
            .push((attribute, values.as_slice()));
    }

    let mut root = Element::root(Schema::Untl);
    for (tag, attributes) in &fields {
        let count = attributes.first().map_or(0, |(_, values)| values.len());
        if attributes.iter().any(|(_, values)| values.len() != count) {
            return Err(UntlError::NumericMismatch((*tag).to_string()));
        }
        for index in 0..count {
            match occurrence(tag, attributes, index)? {
                Some(element) => root.add_child(element)?,
                None => trace!(tag = *tag, index, "empty form occurrence dropped"),
            }
        }
    }

    debug!(fields = fields.len(), elements = root.children().len(), "rebuilt record from form data");
    Ok(tree_to_element_dict(&root))
}

fn occurrence(tag: &str, attributes: &[(&str, &[String])], index: usize) -> Result<Option<Element>> {
    let mut content = "";
    let mut qualifier = "";
    let mut children = Vec::new();
    for (attribute, values) in attributes {
        let value = values[index].as_str();
        match *attribute {
            "content" => content = value,
            "qualifier" => qualifier = value,
            _ if value.is_empty() => {}
            ROLE_ATTRIBUTE => qualifier = value,
            child => children.push(Element::new(Schema::Untl, child)?.with_content(value)?),
        }
    }
    if content.is_empty() && qualifier.is_empty() && children.is_empty() {
        return Ok(None);
    }

    let mut element = Element::new(Schema::Untl, tag)?;
    if !content.is_empty() {
        element.set_content(content)?;
    }
    if !qualifier.is_empty() {
        element.set_qualifier(qualifier)?;
    }
    for child in children {
        element.add_child(child)?;
    }
    Ok(Some(element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Entry;

    fn post(pairs: &[(&str, Vec<&str>)]) -> FormPost {
        pairs
            .iter()
            .map(|(key, values)| {
                (
                    (*key).to_string(),
                    values.iter().map(|value| (*value).to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_post_to_dict() {
        let form = post(&[
            ("creator-name", vec!["Eathing, Sai N."]),
            ("relation-content", vec![""]),
            ("subject-qualifier", vec!["AAT", "AAT"]),
            ("publisher-name", vec!["UNT Art"]),
            ("creator-role", vec!["art"]),
            ("title-content", vec!["Untitled 2000."]),
            ("relation-qualifier", vec![""]),
            ("publish", vec!["Publish"]),
            ("creator-info", vec!["UNT"]),
            ("collection-content", vec!["UNTCVA", "UNTSW"]),
            ("subject-content", vec!["paintings (visual works)", "works of art"]),
            ("creator-type", vec!["per"]),
            ("csrfmiddlewaretoken", vec!["token"]),
            ("title-qualifier", vec!["officialtitle"]),
        ]);
        let dict = post_to_dict(&form, &["publish", "csrfmiddlewaretoken"]).unwrap();

        assert_eq!(
            dict["creator"],
            vec![Entry::children([
                ("name", "Eathing, Sai N."),
                ("info", "UNT"),
                ("type", "per"),
            ])
            .with_qualifier("art")]
        );
        assert_eq!(
            dict["subject"],
            vec![
                Entry::text("paintings (visual works)").with_qualifier("AAT"),
                Entry::text("works of art").with_qualifier("AAT"),
            ]
        );
        assert_eq!(dict["publisher"], vec![Entry::children([("name", "UNT Art")])]);
        assert_eq!(
            dict["title"],
            vec![Entry::text("Untitled 2000.").with_qualifier("officialtitle")]
        );
        assert_eq!(dict["collection"].len(), 2);
        assert!(!dict.contains_key("relation"));
        assert!(!dict.contains_key("publish"));
    }

    #[test]
    fn test_post_to_dict_mismatch() {
        let form = post(&[
            ("subject-qualifier", vec!["AAT", "AAT"]),
            ("subject-content", vec!["paintings (visual works)"]),
        ]);
        let err = post_to_dict(&form, &[]).unwrap_err();
        assert!(matches!(err, UntlError::NumericMismatch(_)));
        assert_eq!(
            err.to_string(),
            "Field values did not match up numerically for subject"
        );
    }

    #[test]
    fn test_post_to_dict_bad_key_and_tag() {
        assert!(matches!(
            post_to_dict(&post(&[("publish", vec!["Publish"])]), &[]),
            Err(UntlError::ParseError(_))
        ));
        assert!(matches!(
            post_to_dict(&post(&[("dog-content", vec!["Bezos"])]), &[]),
            Err(UntlError::UnknownElement { .. })
        ));
    }
}
