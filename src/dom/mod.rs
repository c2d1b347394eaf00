//! In-memory host document.
//!
//! The controller never talks to a browser directly. The host hands it a
//! [`Document`]: an arena of element nodes with classes, attributes, text,
//! a vertical layout box and media state. Everything the controller reads
//! (markers, layout) and writes (state classes, overlays, focus) lives here,
//! so behaviour can be driven deterministically.

mod document;
mod types;

pub use document::{Document, DomError, ElementBuilder};
pub use types::{Element, HostCapabilities, LayoutBox, MediaState, NodeId, ReadyState, Tag};

/// A simple element selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `.class`
    Class(String),
    /// `[attr]`
    Attribute(String),
    /// `tag`
    Tag(Tag),
    /// `#id`
    Id(String),
    /// `a, b, ...`
    AnyOf(Vec<Selector>),
}

impl Selector {
    pub fn class(name: &str) -> Self {
        Self::Class(name.to_string())
    }

    pub fn attribute(name: &str) -> Self {
        Self::Attribute(name.to_string())
    }

    pub fn id(id: &str) -> Self {
        Self::Id(id.to_string())
    }

    /// `img, video`
    pub fn media() -> Self {
        Self::AnyOf(vec![Self::Tag(Tag::Img), Self::Tag(Tag::Video)])
    }

    /// Whether `element` matches this selector.
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Class(class) => element.has_class(class),
            Self::Attribute(name) => element.has_attribute(name),
            Self::Tag(tag) => element.tag() == tag,
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::AnyOf(selectors) => selectors.iter().any(|s| s.matches(element)),
        }
    }
}
