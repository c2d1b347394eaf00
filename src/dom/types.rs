//! Core node types for the host document.

use std::collections::BTreeMap;
use std::fmt;

/// Index of an element in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element tag names the controller cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Head,
    Body,
    Div,
    Span,
    P,
    H3,
    H4,
    H5,
    I,
    Button,
    Img,
    Video,
    Style,
    Other(String),
}

impl Tag {
    /// Lowercase HTML tag name.
    pub fn name(&self) -> &str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Div => "div",
            Self::Span => "span",
            Self::P => "p",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::I => "i",
            Self::Button => "button",
            Self::Img => "img",
            Self::Video => "video",
            Self::Style => "style",
            Self::Other(name) => name,
        }
    }

    /// Whether this is a media element (image or video).
    pub const fn is_media(&self) -> bool {
        matches!(self, Self::Img | Self::Video)
    }

    /// Void elements are serialized without a closing tag.
    pub(crate) const fn is_void(&self) -> bool {
        matches!(self, Self::Img)
    }
}

/// Document readiness as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Still parsing; setup must wait for the ready signal.
    Loading,
    /// Parsed and ready for setup.
    #[default]
    Complete,
}

/// Host environment capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether the host can watch element intersections with the viewport
    pub intersection_observer: bool,
    /// Whether media playback may start without a user gesture
    pub autoplay: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            autoplay: true,
        }
    }
}

/// Vertical layout box of an element, in CSS pixels from the document top.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub top: f64,
    pub height: f64,
}

impl LayoutBox {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Playback and load state of an image or video element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaState {
    /// Image has finished loading (the DOM `complete` flag)
    pub complete: bool,
    /// Video is currently playing
    pub playing: bool,
    /// Video playback position in seconds
    pub current_time: f64,
    /// Number of times `src` was assigned
    pub src_writes: u32,
    /// Number of times `load()` was called on a video
    pub load_calls: u32,
}

/// A single element node.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) tag: Tag,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) layout: LayoutBox,
    pub(crate) media: MediaState,
}

impl Element {
    pub(crate) fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            layout: LayoutBox::default(),
            media: MediaState::default(),
        }
    }

    pub const fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Own text, excluding descendants.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub const fn layout(&self) -> LayoutBox {
        self.layout
    }

    pub const fn media(&self) -> &MediaState {
        &self.media
    }
}
