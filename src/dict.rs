//! The dictionary form of a record and its conversion to and from trees.
//!
//! A [`MetadataDict`] maps each tag to the list of its occurrences, in the
//! order tags were first seen. An occurrence is an [`Entry`] whose content
//! is either plain text or, for compound elements such as `creator`, an
//! ordered map of child tag to child text:
//!
//! ```text
//! {
//!   "title":   [{"qualifier": "officialtitle", "content": "Tres Actos"}],
//!   "creator": [{"qualifier": "aut",
//!                "content": {"name": "Last, Furston, 1807-1865.", "type": "per"}}]
//! }
//! ```
//!
//! [`tree_to_dict`] and [`dict_to_tree`] are inverse for dictionaries whose
//! entries all carry trimmed, non-empty content.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::element::Element;
use crate::error::Result;
use crate::schema::Schema;

/// Tag → ordered list of occurrences.
pub type MetadataDict = IndexMap<String, Vec<Entry>>;

/// Tag → list of plain content strings, as used by the DC and Highwire exports.
pub type FormattedDict = IndexMap<String, Vec<String>>;

/// One occurrence of a tag in a [`MetadataDict`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Qualifier attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    /// ETD-MS contributor role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// ETD-MS subject scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Text or child map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

impl Entry {
    /// An entry with text content.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(Content::Text(content.into())),
            ..Self::default()
        }
    }

    /// An entry whose content is a child map.
    pub fn children<K, V>(children: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            content: Some(Content::Children(
                children
                    .into_iter()
                    .map(|(tag, text)| (tag.into(), text.into()))
                    .collect(),
            )),
            ..Self::default()
        }
    }

    /// Sets the qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Returns the text content, or `None` for child maps and empty entries.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_ref().and_then(Content::as_text)
    }

    /// Returns the single attribute written in XML, by priority qualifier,
    /// role, scheme.
    #[must_use]
    pub fn attribute(&self) -> Option<(&'static str, &str)> {
        if let Some(qualifier) = &self.qualifier {
            Some(("qualifier", qualifier))
        } else if let Some(role) = &self.role {
            Some(("role", role))
        } else {
            self.scheme.as_deref().map(|scheme| ("scheme", scheme))
        }
    }
}

/// Content of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Text of a leaf element.
    Text(String),
    /// Child tag → child text of a compound element.
    Children(IndexMap<String, String>),
}

impl Content {
    /// Returns the text of a leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Children(_) => None,
        }
    }

    /// Returns the child map of a compound.
    #[must_use]
    pub fn as_children(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Self::Text(_) => None,
            Self::Children(children) => Some(children),
        }
    }

    /// Returns true for empty text or an empty child map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Children(children) => children.is_empty(),
        }
    }

    /// Renders the content as one line of text. Child values are joined
    /// with `"; "`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Children(children) => children
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Converts the direct children of `root` into a dictionary.
///
/// Compound elements become a map of their children that hold content.
/// Leaves keep their content only when it is non-blank. Occurrences that end
/// up without content are dropped, but their tag key is still created.
#[must_use]
pub fn tree_to_dict(root: &Element) -> MetadataDict {
    let mut dict = MetadataDict::new();
    for element in root.children() {
        let entries = dict.entry(element.tag().to_string()).or_default();
        let content = if element.has_children() {
            let children = child_map(element);
            (!children.is_empty()).then_some(Content::Children(children))
        } else {
            element
                .content()
                .filter(|text| !text.trim().is_empty())
                .map(|text| Content::Text(text.to_string()))
        };
        match content {
            Some(content) => entries.push(entry_attributes(element, Some(content))),
            None => trace!(tag = element.tag(), "dropping element without content"),
        }
    }
    dict
}

/// Converts the direct children of `root` into a dictionary without dropping
/// anything.
///
/// Every occurrence gets an entry. Compound elements always get a child map,
/// even an empty one. This is the shape form data is rebuilt into.
#[must_use]
pub fn tree_to_element_dict(root: &Element) -> MetadataDict {
    let mut dict = MetadataDict::new();
    for element in root.children() {
        let content = if element.spec().is_compound() {
            Some(Content::Children(child_map(element)))
        } else {
            element.content().map(|text| Content::Text(text.to_string()))
        };
        dict.entry(element.tag().to_string())
            .or_default()
            .push(entry_attributes(element, content));
    }
    dict
}

fn child_map(element: &Element) -> IndexMap<String, String> {
    element
        .children()
        .iter()
        .filter_map(|child| {
            child
                .content()
                .map(|text| (child.tag().to_string(), text.to_string()))
        })
        .collect()
}

fn entry_attributes(element: &Element, content: Option<Content>) -> Entry {
    Entry {
        qualifier: element.qualifier().map(str::to_string),
        role: element.role().map(str::to_string),
        scheme: element.scheme().map(str::to_string),
        content,
    }
}

/// Builds a tree of `schema` from a dictionary.
///
/// Elements are added in dictionary order. Child maps become child
/// elements of a parent that carries the entry's attributes.
///
/// # Errors
///
/// Returns [`UntlError::UnknownElement`](crate::UntlError::UnknownElement)
/// for tags outside the schema and
/// [`UntlError::Structure`](crate::UntlError::Structure) when an entry does
/// not fit its element's capabilities.
pub fn dict_to_tree(dict: &MetadataDict, schema: Schema) -> Result<Element> {
    let mut root = Element::root(schema);
    for (tag, entries) in dict {
        for entry in entries {
            root.add_child(entry_to_element(schema, tag, entry)?)?;
        }
    }
    Ok(root)
}

fn entry_to_element(schema: Schema, tag: &str, entry: &Entry) -> Result<Element> {
    let mut element = Element::new(schema, tag)?;
    if let Some(qualifier) = &entry.qualifier {
        element.set_qualifier(qualifier)?;
    }
    if let Some(role) = &entry.role {
        element.set_role(role)?;
    }
    if let Some(scheme) = &entry.scheme {
        element.set_scheme(scheme)?;
    }
    match &entry.content {
        Some(Content::Children(children)) => {
            for (child_tag, text) in children {
                element.add_child(Element::new(schema, child_tag)?.with_content(text)?)?;
            }
        }
        Some(Content::Text(text)) => element.set_content(text)?,
        None => {}
    }
    Ok(element)
}

/// Pads `dict` with one blank entry for every tag of the schema's canonical
/// order that it lacks.
///
/// - a leaf taking content and a qualifier gets `{"content": "", "qualifier": ""}`
/// - a leaf taking content only gets `{"content": ""}`
/// - a compound gets a map of all its children set to `""`
pub fn add_empty_fields(dict: &mut MetadataDict, schema: Schema) {
    for tag in schema.ordering() {
        if dict.contains_key(*tag) {
            continue;
        }
        let Some(spec) = schema.element_spec(tag) else {
            continue;
        };
        let blank = if spec.is_compound() {
            Entry::children(spec.contained_children.iter().map(|child| (*child, "")))
        } else if spec.allows_qualifier {
            Entry::text("").with_qualifier("")
        } else {
            Entry::text("")
        };
        dict.insert((*tag).to_string(), vec![blank]);
    }
}

/// Flattens each entry to its rendered content.
#[must_use]
pub fn format_dict(dict: &MetadataDict) -> FormattedDict {
    dict.iter()
        .map(|(tag, entries)| {
            let values = entries
                .iter()
                .filter_map(|entry| entry.content.as_ref().map(Content::render))
                .collect();
            (tag.clone(), values)
        })
        .collect()
}
