//! XML reading and writing for every schema.
//!
//! Output is always an `<?xml version="1.0" encoding="UTF-8"?>` declaration
//! followed by a tree indented with two spaces and a trailing newline.
//! Two writers exist:
//!
//! - [`dict_to_xml_string`] writes a [`MetadataDict`] under an [`XmlOptions`]
//!   layout (ordering, root label, prefixes, namespaces). Text is raw UTF-8.
//! - [`tree_to_xml_string`] writes a UNTL [`Element`] tree directly. Every
//!   non-ASCII character becomes a numeric character reference, and elements
//!   can be bound to the `untl:` namespace prefix.
//!
//! [`xml_to_tree`] is a streaming reader built on `quick_xml` events. It
//! strips namespace prefixes and rejects tags outside the schema.
//!
//! # Examples
//!
//! ```ignore
//! use untl::{xml, Schema};
//!
//! let tree = xml::xml_str_to_tree(
//!     "<metadata><title qualifier=\"officialtitle\">Tres Actos</title></metadata>",
//!     Schema::Untl,
//! )?;
//! let dict = untl::dict::tree_to_dict(&tree);
//! let out = xml::dict_to_xml_string(&dict, &xml::XmlOptions::untl())?;
//! assert!(out.contains("<title qualifier=\"officialtitle\">Tres Actos</title>"));
//! # Ok::<(), untl::UntlError>(())
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::dict::{Content, Entry, MetadataDict};
use crate::element::Element;
use crate::error::{Result, UntlError};
use crate::schema::{dublin_core, etd_ms, order_index, untl, Schema};

/// Layout of a document written by [`dict_to_xml_string`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Canonical tag order. Tags outside it are not written.
    pub ordering: &'static [&'static str],
    /// Root element name, without prefix.
    pub root_label: String,
    /// Prefix of the root element, e.g. `oai_dc`.
    pub root_prefix: Option<String>,
    /// Prefix of the top-level elements, e.g. `dc`. Grandchildren are never prefixed.
    pub element_prefix: Option<String>,
    /// Namespace declarations on the root, `None` meaning the default namespace.
    pub namespaces: Vec<(Option<String>, String)>,
    /// Extra root attributes, written after the namespace declarations.
    pub root_attributes: Vec<(String, String)>,
    /// Fixed child order for compound tags, e.g. ETD-MS `degree`.
    pub child_orderings: Vec<(&'static str, &'static [&'static str])>,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self::untl()
    }
}

impl XmlOptions {
    /// Plain `<metadata>` root in UNTL order.
    #[must_use]
    pub fn untl() -> Self {
        Self {
            ordering: untl::UNTL_XML_ORDER,
            root_label: Schema::Untl.root_tag().to_string(),
            root_prefix: None,
            element_prefix: None,
            namespaces: Vec::new(),
            root_attributes: Vec::new(),
            child_orderings: Vec::new(),
        }
    }

    /// OAI Dublin Core: `oai_dc:dc` root, `dc:` elements and `xsi:schemaLocation`.
    #[must_use]
    pub fn dublin_core() -> Self {
        Self {
            ordering: dublin_core::DC_ORDER,
            root_label: Schema::DublinCore.root_tag().to_string(),
            root_prefix: Some("oai_dc".to_string()),
            element_prefix: Some("dc".to_string()),
            namespaces: owned_namespaces(dublin_core::DC_NAMESPACES),
            root_attributes: vec![(
                "xsi:schemaLocation".to_string(),
                dublin_core::DC_SCHEMA_LOCATION.to_string(),
            )],
            child_orderings: Vec::new(),
        }
    }

    /// ETD-MS: `thesis` root in the default ETD-MS namespace.
    #[must_use]
    pub fn etd_ms() -> Self {
        Self {
            ordering: etd_ms::ETD_MS_ORDER,
            root_label: Schema::EtdMs.root_tag().to_string(),
            root_prefix: None,
            element_prefix: None,
            namespaces: owned_namespaces(etd_ms::ETD_MS_NAMESPACES),
            root_attributes: Vec::new(),
            child_orderings: vec![("degree", etd_ms::DEGREE_ORDER)],
        }
    }

    /// The preset matching `schema`.
    ///
    /// Highwire has no dictionary layout of its own and falls back to UNTL.
    #[must_use]
    pub fn for_schema(schema: Schema) -> Self {
        match schema {
            Schema::Untl | Schema::Highwire => Self::untl(),
            Schema::DublinCore => Self::dublin_core(),
            Schema::EtdMs => Self::etd_ms(),
        }
    }

    /// Sets the canonical ordering.
    #[must_use]
    pub fn with_ordering(mut self, ordering: &'static [&'static str]) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the root label.
    #[must_use]
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Adds a namespace declaration.
    #[must_use]
    pub fn with_namespace(mut self, prefix: Option<&str>, uri: impl Into<String>) -> Self {
        self.namespaces.push((prefix.map(str::to_string), uri.into()));
        self
    }

    /// Adds a root attribute.
    #[must_use]
    pub fn with_root_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.root_attributes.push((key.into(), value.into()));
        self
    }

    fn root_name(&self) -> String {
        prefixed(self.root_prefix.as_deref(), &self.root_label)
    }

    fn element_name(&self, tag: &str) -> String {
        prefixed(self.element_prefix.as_deref(), tag)
    }

    fn root_attribute_pairs(&self) -> Vec<(String, String)> {
        self.namespaces
            .iter()
            .map(|(prefix, uri)| {
                let key = match prefix {
                    Some(prefix) => format!("xmlns:{prefix}"),
                    None => "xmlns".to_string(),
                };
                (key, uri.clone())
            })
            .chain(self.root_attributes.iter().cloned())
            .collect()
    }

    fn ordered_children<'a>(
        &self,
        tag: &str,
        children: &'a indexmap::IndexMap<String, String>,
    ) -> Vec<(&'a str, &'a str)> {
        let mut pairs: Vec<(&str, &str)> = children
            .iter()
            .map(|(child, text)| (child.as_str(), text.as_str()))
            .collect();
        if let Some((_, ordering)) = self.child_orderings.iter().find(|(name, _)| *name == tag) {
            pairs.sort_by_key(|(child, _)| order_index(ordering, child));
        }
        pairs
    }
}

fn owned_namespaces(namespaces: &[(Option<&str>, &str)]) -> Vec<(Option<String>, String)> {
    namespaces
        .iter()
        .map(|(prefix, uri)| (prefix.map(str::to_string), (*uri).to_string()))
        .collect()
}

fn prefixed(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{name}"),
        None => name.to_string(),
    }
}

/// How characters outside markup are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escaping {
    /// Raw UTF-8.
    Utf8,
    /// Non-ASCII characters as `&#N;`.
    Ascii,
}

/// Escapes `text` for XML.
///
/// Text escapes `&`, `<` and `>`. Attributes also escape `"` and write
/// newline, carriage return and tab as character references.
pub(crate) fn escape(text: &str, attribute: bool, escaping: Escaping) -> Cow<'_, str> {
    let needs_escape = |c: char| {
        matches!(c, '&' | '<' | '>')
            || (attribute && matches!(c, '"' | '\n' | '\r' | '\t'))
            || (escaping == Escaping::Ascii && !c.is_ascii())
    };
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' if attribute => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            c if escaping == Escaping::Ascii && !c.is_ascii() => {
                let _ = write!(out, "&#{};", u32::from(c));
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// An indented document being written into memory.
pub(crate) struct DocumentWriter {
    writer: Writer<Vec<u8>>,
    escaping: Escaping,
}

impl DocumentWriter {
    /// Starts a document with the XML declaration.
    pub(crate) fn new(escaping: Escaping) -> Result<Self> {
        let mut document = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            escaping,
        };
        document.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(document)
    }

    pub(crate) fn start<K, V>(&mut self, name: &str, attributes: &[(K, V)]) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let start = self.element(name, attributes);
        self.write(Event::Start(start))
    }

    pub(crate) fn empty<K, V>(&mut self, name: &str, attributes: &[(K, V)]) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let empty = self.element(name, attributes);
        self.write(Event::Empty(empty))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name.to_string())))
    }

    /// Writes `<name ..>text</name>` on one line, including for empty text.
    pub(crate) fn text_element<K, V>(
        &mut self,
        name: &str,
        attributes: &[(K, V)],
        text: &str,
    ) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.start(name, attributes)?;
        let escaped = escape(text, false, self.escaping);
        self.write(Event::Text(BytesText::from_escaped(escaped)))?;
        self.end(name)
    }

    /// Returns the document with its trailing newline.
    pub(crate) fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes)
            .map_err(|e| UntlError::ParseError(format!("Failed to encode XML as UTF-8: {e}")))
    }

    fn element<K, V>(&self, name: &str, attributes: &[(K, V)]) -> BytesStart<'static>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut start = BytesStart::new(name.to_string());
        for (key, value) in attributes {
            let escaped = escape(value.as_ref(), true, self.escaping);
            start.push_attribute(Attribute::from((key.as_ref().as_bytes(), escaped.as_bytes())));
        }
        start
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| UntlError::ParseError(format!("Failed to write XML: {e}")))
    }
}

/// Serializes a dictionary under `options`.
///
/// Tags are written in `options.ordering`; entries without content are
/// skipped. Each element carries at most one attribute (see
/// [`Entry::attribute`]).
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] if the XML writer fails.
pub fn dict_to_xml_string(dict: &MetadataDict, options: &XmlOptions) -> Result<String> {
    let mut document = DocumentWriter::new(Escaping::Utf8)?;
    let root_name = options.root_name();
    let root_attributes = options.root_attribute_pairs();

    let entries: Vec<(&str, &Entry)> = options
        .ordering
        .iter()
        .filter_map(|tag| dict.get_key_value(*tag))
        .flat_map(|(tag, entries)| {
            entries
                .iter()
                .filter(|entry| entry.content.is_some())
                .map(move |entry| (tag.as_str(), entry))
        })
        .collect();

    if entries.is_empty() {
        document.empty(&root_name, &root_attributes)?;
    } else {
        document.start(&root_name, &root_attributes)?;
        for (tag, entry) in entries {
            write_entry(&mut document, tag, entry, options)?;
        }
        document.end(&root_name)?;
    }
    document.finish()
}

fn write_entry(
    document: &mut DocumentWriter,
    tag: &str,
    entry: &Entry,
    options: &XmlOptions,
) -> Result<()> {
    let name = options.element_name(tag);
    let attributes: Vec<(&str, &str)> = entry.attribute().into_iter().collect();
    match &entry.content {
        Some(Content::Text(text)) => document.text_element(&name, &attributes, text),
        Some(Content::Children(children)) if children.is_empty() => {
            document.empty(&name, &attributes)
        }
        Some(Content::Children(children)) => {
            document.start(&name, &attributes)?;
            for (child, text) in options.ordered_children(tag, children) {
                document.text_element::<&str, &str>(child, &[], text)?;
            }
            document.end(&name)
        }
        None => Ok(()),
    }
}

/// Serializes a tree as ASCII-safe XML, children in canonical order.
///
/// With `use_namespace`, every element is prefixed `untl:` and the root
/// declares the UNTL namespace.
///
/// # Errors
///
/// Returns [`UntlError::ParseError`] if the XML writer fails.
pub fn tree_to_xml_string(root: &Element, use_namespace: bool) -> Result<String> {
    let mut document = DocumentWriter::new(Escaping::Ascii)?;
    let prefix = use_namespace.then_some(untl::UNTL_PREFIX);
    let root_name = prefixed(prefix, root.tag());
    let root_attributes: Vec<(String, &str)> = if use_namespace {
        vec![(format!("xmlns:{}", untl::UNTL_PREFIX), untl::UNTL_NAMESPACE)]
    } else {
        Vec::new()
    };

    let mut children: Vec<&Element> = root.children().iter().collect();
    children.sort_by_key(|child| root.schema().order_index(child.tag()));

    if children.is_empty() {
        document.empty(&root_name, &root_attributes)?;
    } else {
        document.start(&root_name, &root_attributes)?;
        for child in children {
            write_tree_element(&mut document, child, prefix)?;
        }
        document.end(&root_name)?;
    }
    document.finish()
}

fn write_tree_element(
    document: &mut DocumentWriter,
    element: &Element,
    prefix: Option<&str>,
) -> Result<()> {
    let name = prefixed(prefix, element.tag());
    let attribute = element
        .qualifier()
        .map(|value| ("qualifier", value))
        .or_else(|| element.role().map(|value| ("role", value)))
        .or_else(|| element.scheme().map(|value| ("scheme", value)));
    let attributes: Vec<(&str, &str)> = attribute.into_iter().collect();

    if element.has_children() {
        document.start(&name, &attributes)?;
        for child in element.children() {
            write_tree_element(document, child, prefix)?;
        }
        document.end(&name)
    } else if let Some(text) = element.content() {
        document.text_element(&name, &attributes, text)
    } else {
        document.empty(&name, &attributes)
    }
}

struct Frame {
    element: Element,
    text: String,
}

/// Parses an XML document into a tree of `schema`.
///
/// Only the text preceding an element's first child is taken as its
/// content, trimmed and ignored when blank. A non-empty `qualifier`
/// attribute is applied; `role` and `scheme` are applied where the schema
/// allows them.
///
/// # Errors
///
/// Returns [`UntlError::UnknownElement`] for tags outside the schema,
/// [`UntlError::Structure`] when the document nests or fills elements
/// illegally and [`UntlError::ParseError`] for malformed XML.
pub fn xml_to_tree<R: BufRead>(source: R, schema: Schema) -> Result<Element> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            UntlError::ParseError(format!(
                "Failed to parse XML at position {}: {e}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(start) => {
                let element = open_element(&start, schema)?;
                stack.push(Frame {
                    element,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                let element = open_element(&start, schema)?;
                if let Some(root) = attach(&mut stack, element)? {
                    return Ok(parsed(root));
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    if !frame.element.has_children() {
                        let text = text.unescape().map_err(|e| {
                            UntlError::ParseError(format!("Failed to unescape XML text: {e}"))
                        })?;
                        frame.text.push_str(&text);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    if !frame.element.has_children() {
                        let raw = data.into_inner();
                        let text = std::str::from_utf8(&raw).map_err(|e| {
                            UntlError::ParseError(format!("Failed to decode CDATA: {e}"))
                        })?;
                        frame.text.push_str(text);
                    }
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(UntlError::ParseError(
                        "Failed to parse XML: unbalanced end tag".to_string(),
                    ));
                };
                let mut element = frame.element;
                if !frame.text.trim().is_empty() {
                    element.set_content(&frame.text)?;
                }
                if let Some(root) = attach(&mut stack, element)? {
                    return Ok(parsed(root));
                }
            }
            Event::Eof => {
                return Err(UntlError::ParseError(
                    "Failed to parse XML: document ended before the root element closed"
                        .to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parsed(root: Element) -> Element {
    debug!(
        schema = %root.schema(),
        elements = root.children().len(),
        "parsed XML record"
    );
    root
}

fn open_element(start: &BytesStart<'_>, schema: Schema) -> Result<Element> {
    let local_name = start.local_name();
    let tag = std::str::from_utf8(local_name.as_ref())
        .map_err(|e| UntlError::ParseError(format!("Failed to decode XML tag name: {e}")))?;
    let mut element = Element::new(schema, tag)?;
    if let Some(qualifier) = attribute_value(start, "qualifier")? {
        element.set_qualifier(qualifier)?;
    }
    if element.spec().allows_role {
        if let Some(role) = attribute_value(start, "role")? {
            element.set_role(role)?;
        }
    }
    if element.spec().allows_scheme {
        if let Some(scheme) = attribute_value(start, "scheme")? {
            element.set_scheme(scheme)?;
        }
    }
    Ok(element)
}

/// Returns the unescaped value of `key`, or `None` when absent or empty.
fn attribute_value(start: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    let attribute = start
        .try_get_attribute(key)
        .map_err(|e| UntlError::ParseError(format!("Failed to read XML attribute: {e}")))?;
    let Some(attribute) = attribute else {
        return Ok(None);
    };
    let value = attribute
        .unescape_value()
        .map_err(|e| UntlError::ParseError(format!("Failed to unescape XML attribute: {e}")))?;
    Ok((!value.is_empty()).then(|| value.into_owned()))
}

fn attach(stack: &mut [Frame], element: Element) -> Result<Option<Element>> {
    match stack.last_mut() {
        Some(parent) => {
            parent.element.add_child(element)?;
            Ok(None)
        }
        None => Ok(Some(element)),
    }
}

/// Parses an XML string. See [`xml_to_tree`].
///
/// # Errors
///
/// As [`xml_to_tree`].
pub fn xml_str_to_tree(xml: &str, schema: Schema) -> Result<Element> {
    xml_to_tree(xml.as_bytes(), schema)
}

/// Parses an XML file. See [`xml_to_tree`].
///
/// # Errors
///
/// Returns [`UntlError::IoError`] if the file cannot be opened, otherwise as
/// [`xml_to_tree`].
pub fn xml_file_to_tree(path: impl AsRef<Path>, schema: Schema) -> Result<Element> {
    let file = File::open(path.as_ref())?;
    xml_to_tree(BufReader::new(file), schema)
}

/// Writes an XML string to `path`.
///
/// # Errors
///
/// Returns [`UntlError::Generation`] carrying the path and the I/O cause.
pub fn write_xml_file(path: impl AsRef<Path>, xml: &str) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, xml).map_err(|source| UntlError::Generation {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `dict` under `options` and writes it to `path`.
///
/// # Errors
///
/// Returns [`UntlError::Generation`] if the file cannot be written.
pub fn dict_to_xml_file(
    path: impl AsRef<Path>,
    dict: &MetadataDict,
    options: &XmlOptions,
) -> Result<()> {
    let xml = dict_to_xml_string(dict, options)?;
    write_xml_file(path, &xml)
}
