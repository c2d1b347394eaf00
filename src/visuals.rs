//! Research themes and generated visual cards.

use std::fmt;

use crate::dom::{Document, NodeId, Selector, Tag};
use crate::paper::PaperData;

/// Characters of the abstract shown on a paper card.
const ABSTRACT_PREVIEW_CHARS: usize = 150;

/// Visual theme of a research topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResearchTheme {
    Vr,
    Ar,
    Haptics,
    Hci,
}

impl ResearchTheme {
    /// Classify a keyword list.
    ///
    /// Keywords are joined with spaces, lowercased and searched for
    /// substrings. Rules are tried in order and the first hit wins:
    /// vr, then ar, then haptics; anything else is hci.
    pub fn detect<S: AsRef<str>>(keywords: &[S]) -> Self {
        let haystack = keywords
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let has = |needle: &str| haystack.contains(needle);

        if has("virtual reality") || has("vr") {
            Self::Vr
        } else if has("augmented reality") || has("ar") {
            Self::Ar
        } else if has("haptic") || has("touch") {
            Self::Haptics
        } else {
            Self::Hci
        }
    }

    /// Short name, also used as a CSS class.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vr => "vr",
            Self::Ar => "ar",
            Self::Haptics => "haptics",
            Self::Hci => "hci",
        }
    }

    /// Parse a theme name; unknown names fall back to hci.
    pub fn from_name(name: &str) -> Self {
        match name {
            "vr" => Self::Vr,
            "ar" => Self::Ar,
            "haptics" => Self::Haptics,
            _ => Self::Hci,
        }
    }

    /// Font Awesome classes of the theme icon.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Vr => "fas fa-vr-cardboard",
            Self::Ar => "fas fa-cube",
            Self::Haptics => "fas fa-hand-paper",
            Self::Hci => "fas fa-laptop",
        }
    }
}

impl fmt::Display for ResearchTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Icon classes for a theme name, hci for anything unrecognized.
pub fn icon_for_name(name: &str) -> &'static str {
    ResearchTheme::from_name(name).icon()
}

/// Build a detached placeholder card for `paper`.
///
/// ```text
/// div.generated-visual
///   div.visual-content.<theme>
///     div.visual-icon > i.<icon>
///     div.visual-text > h4(title), p(abstract preview...)
/// ```
pub fn paper_visual(doc: &mut Document, paper: &PaperData) -> NodeId {
    let theme = ResearchTheme::detect(paper.keywords());
    let preview: String = paper
        .abstract_text
        .chars()
        .take(ABSTRACT_PREVIEW_CHARS)
        .collect();

    let root = doc.build(Tag::Div).class("generated-visual").finish();
    let content = doc
        .build(Tag::Div)
        .class("visual-content")
        .class(theme.name())
        .child_of(root)
        .finish();
    let icon_box = doc
        .build(Tag::Div)
        .class("visual-icon")
        .child_of(content)
        .finish();
    let icon = doc.build(Tag::I).child_of(icon_box).finish();
    for class in theme.icon().split_whitespace() {
        doc.add_class(icon, class);
    }
    let text = doc
        .build(Tag::Div)
        .class("visual-text")
        .child_of(content)
        .finish();
    let _title = doc
        .build(Tag::H4)
        .text(&paper.title)
        .child_of(text)
        .finish();
    let _abstract = doc
        .build(Tag::P)
        .text(&format!("{preview}..."))
        .child_of(text)
        .finish();

    tracing::debug!(theme = %theme, title = %paper.title, "visuals.paper_card");
    root
}

/// Mark matching images for the pan/zoom effect.
///
/// Each match gets `pan-zoom-image` and is wrapped in a
/// `div.image-container` unless its parent already is one. Returns the
/// matched images.
pub fn add_pan_zoom_effect(doc: &mut Document, selector: &Selector) -> Vec<NodeId> {
    let images = doc.query_all(selector);
    for &img in &images {
        doc.add_class(img, "pan-zoom-image");
        let Some(parent) = doc.element(img).parent() else {
            continue;
        };
        if doc.has_class(parent, "image-container") {
            continue;
        }
        let container = doc.build(Tag::Div).class("image-container").finish();
        let wrapped = doc
            .insert_before(parent, container, img)
            .and_then(|()| doc.append_child(container, img));
        if let Err(err) = wrapped {
            tracing::warn!(node = %img, error = %err, "visuals.pan_zoom.wrap_failed");
        }
    }
    images
}
