use std::time::Instant;

use crate::app::Model;
use crate::dom::{NodeId, Selector};

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    Char(char),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Enter),
            " " | "Spacebar" => Some(Self::Space),
            "Escape" | "Esc" => Some(Self::Escape),
            "Tab" => Some(Self::Tab),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(Self::Char(ch)),
                    _ => None,
                }
            }
        }
    }

    const fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Host events delivered to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The document finished parsing
    DocumentReady,

    // Viewport
    /// Scroll so the given offset is at the top
    ScrollTo(f64),
    /// Scroll by a signed delta
    ScrollBy(f64),
    /// The visible height changed
    Resize(f64),
    /// Element layout changed; carries the new document height
    LayoutChanged(f64),

    // Input
    /// Click on `target` (bubbles)
    Click(NodeId),
    /// Key pressed while `target` had focus (bubbles)
    KeyDown(NodeId, Key),
    /// Pointer entered `target` itself (does not bubble)
    PointerEnter(NodeId),
    /// Pointer left `target` itself (does not bubble)
    PointerLeave(NodeId),

    // Media
    /// An image finished loading
    MediaLoaded(NodeId),
    /// An image failed to load
    MediaFailed(NodeId),

    /// Advance the controller clock
    Tick(Instant),
}

/// Apply one host event to the controller state.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::DocumentReady => model.document_ready(),

        Message::ScrollTo(offset) => {
            model.viewport.scroll_to(offset);
            model.evaluate_watches();
        }
        Message::ScrollBy(delta) => {
            model.viewport.scroll_by(delta);
            model.evaluate_watches();
        }
        Message::Resize(height) => {
            model.viewport.resize(height);
            model.evaluate_watches();
        }
        Message::LayoutChanged(total_height) => {
            model.viewport.set_total_height(total_height);
            model.evaluate_watches();
        }

        Message::Click(target) => handle_click(&mut model, target),
        Message::KeyDown(target, key) => handle_key(&mut model, target, key),

        Message::PointerEnter(target) => {
            if let Some(video) = hover_video(&model, target) {
                // Autoplay restrictions may reject playback; hover preview is optional.
                if let Err(err) = model.document.play(video) {
                    tracing::debug!(node = %video, error = %err, "gallery.preview.rejected");
                }
            }
        }
        Message::PointerLeave(target) => {
            if let Some(video) = hover_video(&model, target) {
                model.document.pause(video);
                model.document.set_current_time(video, 0.0);
            }
        }

        Message::MediaLoaded(image) => {
            model.document.set_complete(image, true);
            if let Some(entry) = model.progressive_for(image) {
                model.document.remove_class(entry.container, "loading");
            }
        }
        Message::MediaFailed(image) => {
            if let Some(entry) = model.progressive_for(image) {
                model.document.remove_class(entry.container, "loading");
                model.document.add_class(entry.container, "error");
                tracing::debug!(node = %image, "progressive.error");
            }
        }

        Message::Tick(now) => model.advance_clock(now),
    }
    model
}

fn hover_video(model: &Model, target: NodeId) -> Option<NodeId> {
    model
        .registrations()
        .gallery
        .iter()
        .find(|g| g.item == target)
        .and_then(|g| g.video)
}

fn handle_click(model: &mut Model, target: NodeId) {
    if let Some(kind) = model.sessions().session_containing(&model.document, target) {
        let Some((root, backdrop)) = model.sessions().get(kind).map(|s| (s.root, s.backdrop))
        else {
            return;
        };
        let on_close_control = model
            .document
            .closest(target, &Selector::class("modal-close"))
            .is_some_and(|close| model.document.contains(root, close));
        // Clicks inside the content box bubble up to the backdrop; only a
        // click on the backdrop itself closes.
        if on_close_control || target == backdrop {
            model.close_session(kind);
        }
        return;
    }

    if let Some(item) = model.gallery_item_for(target) {
        model.open_fullscreen(item.item);
    }
    if let Some(card) = model.topic_card_for(target) {
        model.show_topic_details(card);
    }
}

fn handle_key(model: &mut Model, target: NodeId, key: Key) {
    if key == Key::Escape {
        if let Some(kind) = model.sessions().session_containing(&model.document, target) {
            model.close_session(kind);
        }
        return;
    }
    if key.activates() {
        if let Some(item) = model.gallery_item_for(target) {
            model.open_fullscreen(item.item);
        }
    }
}
