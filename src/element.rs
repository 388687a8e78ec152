//! The element tree model shared by every schema.
//!
//! An [`Element`] is a tagged node with an optional qualifier, optional text
//! content and an ordered list of children. What a node may hold is decided
//! by the static [`ElementSpec`] of its tag, looked up once at construction:
//!
//! - content can only be set when `allows_content` is true
//! - a qualifier can only be set when `allows_qualifier` is true
//! - ETD-MS `role` and `scheme` attributes have their own flags
//! - a child can only be added when its tag is in `contained_children`
//!
//! Every violation is reported as [`UntlError::Structure`] at the point it
//! happens. Text and attribute values are trimmed on assignment.
//!
//! # Examples
//!
//! ```ignore
//! use untl::{Element, Schema};
//!
//! let mut record = Element::root(Schema::Untl);
//! record.add_child(
//!     Element::new(Schema::Untl, "title")?
//!         .with_qualifier("officialtitle")?
//!         .with_content("Tres Actos")?,
//! )?;
//!
//! let mut creator = Element::new(Schema::Untl, "creator")?.with_qualifier("aut")?;
//! creator.add_child(Element::new(Schema::Untl, "name")?.with_content("Last, Furston")?)?;
//! record.add_child(creator)?;
//!
//! assert_eq!(record.children().len(), 2);
//! # Ok::<(), untl::UntlError>(())
//! ```

use std::path::Path;

use crate::error::{Result, UntlError};
use crate::schema::{order_index, ElementSpec, Schema};

/// A node of a metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    schema: Schema,
    spec: &'static ElementSpec,
    qualifier: Option<String>,
    role: Option<String>,
    scheme: Option<String>,
    content: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element of `tag` in `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::UnknownElement`] if the schema does not define `tag`.
    pub fn new(schema: Schema, tag: &str) -> Result<Self> {
        let spec = schema
            .element_spec(tag)
            .ok_or_else(|| UntlError::UnknownElement {
                tag: tag.to_string(),
                schema,
            })?;
        Ok(Self::from_spec(schema, spec))
    }

    /// Creates the empty root element of `schema`.
    #[must_use]
    pub fn root(schema: Schema) -> Self {
        Self::from_spec(schema, schema.root_spec())
    }

    fn from_spec(schema: Schema, spec: &'static ElementSpec) -> Self {
        Self {
            schema,
            spec,
            qualifier: None,
            role: None,
            scheme: None,
            content: None,
            children: Vec::new(),
        }
    }

    /// Returns the element's tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.spec.tag
    }

    /// Returns the schema this element belongs to.
    #[must_use]
    pub const fn schema(&self) -> Schema {
        self.schema
    }

    /// Returns the static capability descriptor of this element's tag.
    #[must_use]
    pub const fn spec(&self) -> &'static ElementSpec {
        self.spec
    }

    /// Returns the qualifier, if any.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Returns the ETD-MS role, if any.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the ETD-MS scheme, if any.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the text content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the children mutably. Tags cannot change, so legality holds.
    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    /// Returns true if the element currently has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Sets the text content.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow content.
    pub fn set_content(&mut self, content: impl AsRef<str>) -> Result<()> {
        if !self.spec.allows_content {
            return Err(self.violation("textual content"));
        }
        self.content = Some(content.as_ref().trim().to_string());
        Ok(())
    }

    /// Sets the qualifier.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow a qualifier.
    pub fn set_qualifier(&mut self, qualifier: impl AsRef<str>) -> Result<()> {
        if !self.spec.allows_qualifier {
            return Err(self.violation("a qualifier"));
        }
        self.qualifier = Some(qualifier.as_ref().trim().to_string());
        Ok(())
    }

    /// Sets the role attribute.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow a role.
    pub fn set_role(&mut self, role: impl AsRef<str>) -> Result<()> {
        if !self.spec.allows_role {
            return Err(self.violation("a role"));
        }
        self.role = Some(role.as_ref().trim().to_string());
        Ok(())
    }

    /// Sets the scheme attribute.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow a scheme.
    pub fn set_scheme(&mut self, scheme: impl AsRef<str>) -> Result<()> {
        if !self.spec.allows_scheme {
            return Err(self.violation("a scheme"));
        }
        self.scheme = Some(scheme.as_ref().trim().to_string());
        Ok(())
    }

    /// Builder form of [`set_content`](Self::set_content).
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow content.
    pub fn with_content(mut self, content: impl AsRef<str>) -> Result<Self> {
        self.set_content(content)?;
        Ok(self)
    }

    /// Builder form of [`set_qualifier`](Self::set_qualifier).
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow a qualifier.
    pub fn with_qualifier(mut self, qualifier: impl AsRef<str>) -> Result<Self> {
        self.set_qualifier(qualifier)?;
        Ok(self)
    }

    /// Builder form of [`set_role`](Self::set_role).
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow a role.
    pub fn with_role(mut self, role: impl AsRef<str>) -> Result<Self> {
        self.set_role(role)?;
        Ok(self)
    }

    /// Builder form of [`set_scheme`](Self::set_scheme).
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the element does not allow a scheme.
    pub fn with_scheme(mut self, scheme: impl AsRef<str>) -> Result<Self> {
        self.set_scheme(scheme)?;
        Ok(self)
    }

    /// Appends a child.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Structure`] if the child's tag is not one of this
    /// element's contained children.
    pub fn add_child(&mut self, child: Element) -> Result<()> {
        if !self.spec.allows_child(child.tag()) {
            return Err(UntlError::Structure(format!(
                "Invalid child \"{}\" for parent \"{}\"",
                child.tag(),
                self.tag()
            )));
        }
        self.children.push(child);
        Ok(())
    }

    /// Returns the first child with `tag`.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag() == tag)
    }

    /// Returns the first child with `tag` mutably.
    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|child| child.tag() == tag)
    }

    /// Returns the content of the first child with `tag`.
    #[must_use]
    pub fn child_content(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Element::content)
    }

    /// Iterates over the children with `tag`.
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.tag() == tag)
    }

    /// Removes every child with `tag`, returning how many were removed.
    pub fn remove_children(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|child| child.tag() != tag);
        before - self.children.len()
    }

    /// Stably sorts the children by their position in `ordering`.
    pub fn sort_children(&mut self, ordering: &[&str]) {
        self.children
            .sort_by_key(|child| order_index(ordering, child.tag()));
    }

    /// Appends a blank child for every contained tag that is not present yet.
    ///
    /// Blank children get empty content when their tag allows content.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema tables are inconsistent.
    pub fn add_missing_children(&mut self) -> Result<()> {
        for tag in self.spec.contained_children {
            if self.child(tag).is_some() {
                continue;
            }
            let mut blank = Element::new(self.schema, tag)?;
            if blank.spec.allows_content {
                blank.set_content("")?;
            }
            self.children.push(blank);
        }
        Ok(())
    }

    /// Serializes the tree as ASCII-safe XML in canonical order.
    ///
    /// See [`crate::xml::tree_to_xml_string`].
    ///
    /// # Errors
    ///
    /// Returns an error if XML generation fails.
    pub fn to_xml_string(&self, use_namespace: bool) -> Result<String> {
        crate::xml::tree_to_xml_string(self, use_namespace)
    }

    /// Writes [`to_xml_string`](Self::to_xml_string) output to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`UntlError::Generation`] if the file cannot be written.
    pub fn write_xml_file(&self, path: impl AsRef<Path>, use_namespace: bool) -> Result<()> {
        let xml = self.to_xml_string(use_namespace)?;
        crate::xml::write_xml_file(path, &xml)
    }

    /// Completeness score of this record in `[0, 1]`.
    ///
    /// See [`crate::quality::completeness`].
    #[must_use]
    pub fn completeness(&self) -> f64 {
        crate::quality::completeness(self)
    }

    fn violation(&self, what: &str) -> UntlError {
        UntlError::Structure(format!(
            "Element \"{}\" does not allow {what}",
            self.tag()
        ))
    }
}
