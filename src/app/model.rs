use std::time::{Duration, Instant};

use crate::dom::{Document, NodeId, ReadyState, Selector, Tag};
use crate::modal::{self, CLOSE_DELAY, SessionKind, SessionRegistry};
use crate::observer::{IntersectionWatch, WatchOptions};
use crate::viewport::Viewport;

/// Attribute holding the deferred media source.
pub const LAZY_SRC_ATTR: &str = "data-lazy-src";

/// Tunables for the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOptions {
    /// Watch options for lazy media
    pub lazy_watch: WatchOptions,
    /// Watch options for scroll animation
    pub animate_watch: WatchOptions,
    /// Delay between hiding a modal and removing it
    pub close_delay: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            lazy_watch: WatchOptions::LAZY,
            animate_watch: WatchOptions::ANIMATE,
            close_delay: CLOSE_DELAY,
        }
    }
}

/// A gallery item and the video it previews on hover, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryItem {
    pub item: NodeId,
    pub video: Option<NodeId>,
}

/// An image inside a `.progressive-image` container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressiveImage {
    pub image: NodeId,
    pub container: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressiveState {
    Loading,
    Loaded,
    Error,
}

/// Elements picked up by setup, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registrations {
    pub lazy: Vec<NodeId>,
    pub animated: Vec<NodeId>,
    pub gallery: Vec<GalleryItem>,
    pub progressive: Vec<ProgressiveImage>,
    pub topic_cards: Vec<NodeId>,
}

impl Registrations {
    pub fn is_empty(&self) -> bool {
        self.lazy.is_empty()
            && self.animated.is_empty()
            && self.gallery.is_empty()
            && self.progressive.is_empty()
            && self.topic_cards.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupState {
    /// Waiting for the document ready signal
    Deferred,
    Done,
}

/// The complete controller state.
///
/// One instance per document, created by the host through
/// [`Model::attach`] and threaded through [`super::update`].
#[derive(Debug)]
pub struct Model {
    /// The host document
    pub document: Document,
    /// Visible window onto the document
    pub viewport: Viewport,
    options: ControllerOptions,
    setup: SetupState,
    registrations: Registrations,
    lazy_watch: Option<IntersectionWatch>,
    animation_watch: Option<IntersectionWatch>,
    sessions: SessionRegistry,
    now: Instant,
}

impl Model {
    /// Attach a controller to `document`.
    ///
    /// Injects the shared stylesheet, then runs setup right away unless the
    /// document is still loading, in which case setup waits for
    /// [`super::Message::DocumentReady`].
    pub fn attach(document: Document, viewport: Viewport, options: ControllerOptions) -> Self {
        let mut model = Self {
            document,
            viewport,
            options,
            setup: SetupState::Deferred,
            registrations: Registrations::default(),
            lazy_watch: None,
            animation_watch: None,
            sessions: SessionRegistry::new(),
            now: Instant::now(),
        };
        crate::styles::inject(&mut model.document);
        if model.document.ready_state() == ReadyState::Loading {
            tracing::debug!("setup.deferred");
        } else {
            model.run_setup();
        }
        model
    }

    pub fn is_setup_complete(&self) -> bool {
        self.setup == SetupState::Done
    }

    pub const fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub const fn registrations(&self) -> &Registrations {
        &self.registrations
    }

    pub const fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub const fn lazy_watch(&self) -> Option<&IntersectionWatch> {
        self.lazy_watch.as_ref()
    }

    pub const fn animation_watch(&self) -> Option<&IntersectionWatch> {
        self.animation_watch.as_ref()
    }

    /// The controller clock, advanced by `Message::Tick`.
    pub const fn now(&self) -> Instant {
        self.now
    }

    pub(super) fn advance_clock(&mut self, now: Instant) {
        self.now = self.now.max(now);
        self.sessions.expire(&mut self.document, self.now);
    }

    pub(super) fn document_ready(&mut self) {
        self.document.set_ready_state(ReadyState::Complete);
        if self.setup == SetupState::Deferred {
            self.run_setup();
        }
    }

    fn run_setup(&mut self) {
        self.setup = SetupState::Done;
        self.setup_lazy_loading();
        self.setup_animations();
        self.setup_gallery();
        self.setup_progressive_images();
        self.setup_topic_cards();
        tracing::debug!(
            lazy = self.registrations.lazy.len(),
            animated = self.registrations.animated.len(),
            gallery = self.registrations.gallery.len(),
            progressive = self.registrations.progressive.len(),
            topics = self.registrations.topic_cards.len(),
            "setup.done"
        );
        self.evaluate_watches();
    }

    fn setup_lazy_loading(&mut self) {
        let targets = self.document.query_all(&Selector::attribute(LAZY_SRC_ATTR));
        if self.document.capabilities().intersection_observer {
            let mut watch = IntersectionWatch::new(self.options.lazy_watch);
            for &id in &targets {
                watch.observe(id);
            }
            self.lazy_watch = Some(watch);
        } else {
            tracing::debug!(count = targets.len(), "lazy.fallback.load_all");
            for &id in &targets {
                self.load_lazy_element(id);
            }
        }
        self.registrations.lazy = targets;
    }

    fn setup_animations(&mut self) {
        let targets = self.document.query_all(&Selector::class("animate-on-scroll"));
        if self.document.capabilities().intersection_observer {
            let mut watch = IntersectionWatch::new(self.options.animate_watch);
            for &id in &targets {
                watch.observe(id);
            }
            self.animation_watch = Some(watch);
        } else {
            tracing::debug!(count = targets.len(), "animate.unsupported");
        }
        self.registrations.animated = targets;
    }

    fn setup_gallery(&mut self) {
        self.registrations.gallery = self
            .document
            .query_all(&Selector::class("gallery-item"))
            .into_iter()
            .map(|item| GalleryItem {
                item,
                video: self.document.query_in(item, &Selector::Tag(Tag::Video)),
            })
            .collect();
    }

    fn setup_progressive_images(&mut self) {
        let container_selector = Selector::class("progressive-image");
        let mut registered = Vec::new();
        for image in self.document.query_all(&Selector::Tag(Tag::Img)) {
            let Some(container) = self
                .document
                .element(image)
                .parent()
                .and_then(|parent| self.document.closest(parent, &container_selector))
            else {
                continue;
            };
            if self.document.element(image).media().complete {
                self.document.remove_class(container, "loading");
            } else {
                self.document.add_class(container, "loading");
            }
            registered.push(ProgressiveImage { image, container });
        }
        self.registrations.progressive = registered;
    }

    fn setup_topic_cards(&mut self) {
        self.registrations.topic_cards = self.document.query_all(&Selector::class("topic-card"));
    }

    /// Run both watches against the current viewport. Each hit fires once.
    pub(super) fn evaluate_watches(&mut self) {
        let lazy_hits = self
            .lazy_watch
            .as_ref()
            .map(|w| w.intersecting(&self.document, &self.viewport))
            .unwrap_or_default();
        for id in lazy_hits {
            self.load_lazy_element(id);
            if let Some(watch) = self.lazy_watch.as_mut() {
                watch.unobserve(id);
            }
        }

        let animate_hits = self
            .animation_watch
            .as_ref()
            .map(|w| w.intersecting(&self.document, &self.viewport))
            .unwrap_or_default();
        for id in animate_hits {
            self.document.add_class(id, "animated");
            if let Some(watch) = self.animation_watch.as_mut() {
                watch.unobserve(id);
            }
            tracing::trace!(node = %id, "animate.trigger");
        }
    }

    /// Move the deferred source into place and drop the marker.
    ///
    /// Returns false when the element has no marker (already loaded) or an
    /// empty one, which is left in place.
    pub(super) fn load_lazy_element(&mut self, id: NodeId) -> bool {
        let Some(src) = self
            .document
            .attribute(id, LAZY_SRC_ATTR)
            .filter(|src| !src.is_empty())
            .map(str::to_owned)
        else {
            return false;
        };
        let tag = self.document.element(id).tag().clone();
        match tag {
            Tag::Img => {
                self.document.set_src(id, &src);
                self.document.add_class(id, "loaded");
            }
            Tag::Video => {
                self.document.set_src(id, &src);
                self.document.load(id);
            }
            _ => {}
        }
        self.document.remove_attribute(id, LAZY_SRC_ATTR);
        tracing::debug!(node = %id, src = %src, tag = tag.name(), "lazy.load");
        true
    }

    /// Registered gallery item at or above `node`.
    pub(super) fn gallery_item_for(&self, node: NodeId) -> Option<GalleryItem> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(item) = self.registrations.gallery.iter().find(|g| g.item == id) {
                return Some(*item);
            }
            current = self.document.element(id).parent();
        }
        None
    }

    /// Registered topic card at or above `node`.
    pub(super) fn topic_card_for(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.registrations.topic_cards.contains(&id) {
                return Some(id);
            }
            current = self.document.element(id).parent();
        }
        None
    }

    pub(super) fn progressive_for(&self, image: NodeId) -> Option<ProgressiveImage> {
        self.registrations
            .progressive
            .iter()
            .find(|p| p.image == image)
            .copied()
    }

    /// Load state of a progressive container.
    pub fn progressive_state(&self, container: NodeId) -> ProgressiveState {
        if self.document.has_class(container, "error") {
            ProgressiveState::Error
        } else if self.document.has_class(container, "loading") {
            ProgressiveState::Loading
        } else {
            ProgressiveState::Loaded
        }
    }

    pub(super) fn open_fullscreen(&mut self, item: NodeId) {
        let Some(session) = modal::build_fullscreen(&mut self.document, item) else {
            tracing::warn!(node = %item, "gallery.item_without_media");
            return;
        };
        self.sessions.open(&mut self.document, session);
    }

    pub(super) fn show_topic_details(&mut self, card: NodeId) {
        let heading = self.document.query_in(card, &Selector::Tag(Tag::H5));
        let paragraph = self.document.query_in(card, &Selector::Tag(Tag::P));
        let (Some(heading), Some(paragraph)) = (heading, paragraph) else {
            tracing::warn!(node = %card, "topic.card_incomplete");
            return;
        };
        let topic = self.document.text_content(heading);
        let description = self.document.text_content(paragraph);
        tracing::info!(topic = %topic, description = %description, "topic.details");

        let session = modal::build_topic(&mut self.document, &topic, &description);
        self.sessions.open(&mut self.document, session);
    }

    pub(super) fn close_session(&mut self, kind: SessionKind) {
        self.sessions
            .close(&mut self.document, kind, self.options.close_delay);
    }

    /// Apply the pan/zoom effect to images matching `selector`.
    pub fn apply_pan_zoom(&mut self, selector: &Selector) -> Vec<NodeId> {
        crate::visuals::add_pan_zoom_effect(&mut self.document, selector)
    }
}
