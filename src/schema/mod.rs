//! Schema registries for the four supported metadata dialects.
//!
//! Each schema owns a fixed, ordered list of top-level tags (used for
//! serialization order and blank-field padding) and a table of static
//! [`ElementSpec`] descriptors giving every tag its capability contract.
//! A single generic [`Element`](crate::element::Element) type consults
//! these descriptors instead of having one type per tag.
//!
//! | Schema | Root | Ordering |
//! |--------|------|----------|
//! | [`Schema::Untl`] | `metadata` | [`untl::UNTL_XML_ORDER`] |
//! | [`Schema::DublinCore`] | `dc` | [`dublin_core::DC_ORDER`] |
//! | [`Schema::EtdMs`] | `thesis` | [`etd_ms::ETD_MS_ORDER`] |
//! | [`Schema::Highwire`] | `metadata` | [`highwire::HIGHWIRE_ORDER`] |

pub mod dublin_core;
pub mod etd_ms;
pub mod highwire;
pub mod untl;

use std::fmt;

/// One of the metadata schemas the toolkit reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// The native UNTL descriptive metadata schema.
    Untl,
    /// Simple (unqualified) Dublin Core.
    DublinCore,
    /// Electronic Theses and Dissertations Metadata Standard.
    EtdMs,
    /// Highwire Press citation meta tags.
    Highwire,
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untl => write!(f, "UNTL"),
            Self::DublinCore => write!(f, "DC"),
            Self::EtdMs => write!(f, "ETD_MS"),
            Self::Highwire => write!(f, "Highwire"),
        }
    }
}

impl Schema {
    /// Returns the tag of the record's root element.
    #[must_use]
    pub const fn root_tag(self) -> &'static str {
        match self {
            Self::Untl | Self::Highwire => "metadata",
            Self::DublinCore => "dc",
            Self::EtdMs => "thesis",
        }
    }

    /// Returns the canonical serialization order of top-level tags.
    #[must_use]
    pub const fn ordering(self) -> &'static [&'static str] {
        match self {
            Self::Untl => untl::UNTL_XML_ORDER,
            Self::DublinCore => dublin_core::DC_ORDER,
            Self::EtdMs => etd_ms::ETD_MS_ORDER,
            Self::Highwire => highwire::HIGHWIRE_ORDER,
        }
    }

    /// Returns every element descriptor the schema defines, root first.
    #[must_use]
    pub const fn elements(self) -> &'static [ElementSpec] {
        match self {
            Self::Untl => untl::ELEMENTS,
            Self::DublinCore => dublin_core::ELEMENTS,
            Self::EtdMs => etd_ms::ELEMENTS,
            Self::Highwire => highwire::ELEMENTS,
        }
    }

    /// Looks up the descriptor for `tag`.
    ///
    /// Returns `None` when the tag is not part of this schema's vocabulary.
    #[must_use]
    pub fn element_spec(self, tag: &str) -> Option<&'static ElementSpec> {
        self.elements().iter().find(|spec| spec.tag == tag)
    }

    /// Returns the descriptor of the root element.
    #[must_use]
    pub fn root_spec(self) -> &'static ElementSpec {
        // Every table starts with its root.
        &self.elements()[0]
    }

    /// Returns the position of `tag` in the canonical ordering.
    ///
    /// Tags outside the ordering sort after every known tag.
    #[must_use]
    pub fn order_index(self, tag: &str) -> usize {
        order_index(self.ordering(), tag)
    }
}

/// Returns the position of `tag` in `ordering`, or `usize::MAX` if absent.
#[must_use]
pub fn order_index(ordering: &[&str], tag: &str) -> usize {
    ordering
        .iter()
        .position(|candidate| *candidate == tag)
        .unwrap_or(usize::MAX)
}

/// Static capability contract for one tag of one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ElementSpec {
    /// The element's tag name.
    pub tag: &'static str,
    /// Whether the element may hold textual content.
    pub allows_content: bool,
    /// Whether the element may carry a `qualifier` attribute.
    pub allows_qualifier: bool,
    /// Whether the element may carry a `role` attribute.
    pub allows_role: bool,
    /// Whether the element may carry a `scheme` attribute.
    pub allows_scheme: bool,
    /// Tags that are legal as children of this element, in canonical order.
    pub contained_children: &'static [&'static str],
}

impl ElementSpec {
    /// A text element that accepts content and a qualifier and has no children.
    #[must_use]
    pub const fn leaf(tag: &'static str) -> Self {
        Self {
            tag,
            allows_content: true,
            allows_qualifier: true,
            allows_role: false,
            allows_scheme: false,
            contained_children: &[],
        }
    }

    /// Disallows the `qualifier` attribute.
    #[must_use]
    pub const fn without_qualifier(self) -> Self {
        Self {
            allows_qualifier: false,
            ..self
        }
    }

    /// Disallows textual content.
    #[must_use]
    pub const fn without_content(self) -> Self {
        Self {
            allows_content: false,
            ..self
        }
    }

    /// Allows the `role` attribute.
    #[must_use]
    pub const fn with_role(self) -> Self {
        Self {
            allows_role: true,
            ..self
        }
    }

    /// Allows the `scheme` attribute.
    #[must_use]
    pub const fn with_scheme(self) -> Self {
        Self {
            allows_scheme: true,
            ..self
        }
    }

    /// Sets the legal child tags.
    #[must_use]
    pub const fn with_children(self, children: &'static [&'static str]) -> Self {
        Self {
            contained_children: children,
            ..self
        }
    }

    /// Returns true if `tag` may be added as a child.
    #[must_use]
    pub fn allows_child(&self, tag: &str) -> bool {
        self.contained_children.contains(&tag)
    }

    /// Returns true if the element holds structured children.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        !self.contained_children.is_empty()
    }
}
