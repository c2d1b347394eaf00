//! Modal sessions: fullscreen gallery views and topic details.
//!
//! A session is an overlay subtree appended to `body`. The registry keeps at
//! most one session per [`SessionKind`]; closing hides the overlay at once and
//! removes it from the document once its deadline passes.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::dom::{Document, NodeId, Selector, Tag};

/// Delay between hiding an overlay and removing it, long enough for the
/// CSS opacity transition.
pub const CLOSE_DELAY: Duration = Duration::from_millis(300);

pub const AI_PLACEHOLDER_TEXT: &str =
    "AI-generated visual content and insights would appear here when OpenAI API is configured.";
pub const RELATED_RESEARCH_TEXT: &str =
    "Related papers and projects would be automatically curated here.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionKind {
    /// Cloned gallery media over a dark backdrop
    Fullscreen,
    /// Topic card heading, description and placeholder
    Topic,
}

impl SessionKind {
    const fn root_class(self) -> &'static str {
        match self {
            Self::Fullscreen => "fullscreen-modal",
            Self::Topic => "topic-modal",
        }
    }

    const fn close_label(self) -> &'static str {
        match self {
            Self::Fullscreen => "Close fullscreen view",
            Self::Topic => "Close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    /// Hidden; the removal deadline is set from the next clock reading.
    ClosePending { delay: Duration },
    /// Hidden; the root is detached at `remove_at`.
    Closing { remove_at: Instant },
}

/// One overlay in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    pub kind: SessionKind,
    pub root: NodeId,
    pub backdrop: NodeId,
    pub close_button: NodeId,
    pub body: NodeId,
    pub state: SessionState,
}

impl ModalSession {
    pub const fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open)
    }
}

/// Build the detached overlay skeleton shared by both kinds.
///
/// ```text
/// div.<kind>-modal
///   div.modal-backdrop
///     div.modal-content
///       [div.modal-header > h3(title)]   (topic only)
///       button.modal-close > i.fas.fa-times
///       div.modal-body
/// ```
fn build_shell(doc: &mut Document, kind: SessionKind, title: Option<&str>) -> ModalSession {
    let root = doc.build(Tag::Div).class(kind.root_class()).finish();
    let backdrop = doc
        .build(Tag::Div)
        .class("modal-backdrop")
        .child_of(root)
        .finish();
    let content = doc
        .build(Tag::Div)
        .class("modal-content")
        .child_of(backdrop)
        .finish();

    let close_parent = match title {
        Some(title) => {
            let header = doc
                .build(Tag::Div)
                .class("modal-header")
                .child_of(content)
                .finish();
            let _h3 = doc.build(Tag::H3).text(title).child_of(header).finish();
            header
        }
        None => content,
    };
    let close_button = doc
        .build(Tag::Button)
        .class("modal-close")
        .attr("aria-label", kind.close_label())
        .child_of(close_parent)
        .finish();
    let _icon = doc
        .build(Tag::I)
        .class("fas")
        .class("fa-times")
        .child_of(close_button)
        .finish();
    let body = doc
        .build(Tag::Div)
        .class("modal-body")
        .child_of(content)
        .finish();

    ModalSession {
        kind,
        root,
        backdrop,
        close_button,
        body,
        state: SessionState::Open,
    }
}

/// Build a fullscreen session for a gallery item.
///
/// The body gets a deep clone of the item's first image or video, marked
/// `fullscreen-content`, and a clone of its `.gallery-overlay` caption
/// re-classed as `fullscreen-overlay`. Returns `None` when the item holds
/// no media.
pub fn build_fullscreen(doc: &mut Document, item: NodeId) -> Option<ModalSession> {
    let media = doc.query_in(item, &Selector::media())?;
    let caption = doc.query_in(item, &Selector::class("gallery-overlay"));

    let session = build_shell(doc, SessionKind::Fullscreen, None);
    let content = doc.clone_node(media, true);
    doc.add_class(content, "fullscreen-content");
    attach(doc, session.body, content);

    if let Some(caption) = caption {
        let caption = doc.clone_node(caption, true);
        doc.remove_class(caption, "gallery-overlay");
        doc.add_class(caption, "fullscreen-overlay");
        attach(doc, session.body, caption);
    }
    Some(session)
}

/// Build a topic detail session.
pub fn build_topic(doc: &mut Document, topic: &str, description: &str) -> ModalSession {
    let session = build_shell(doc, SessionKind::Topic, Some(topic));
    let body = session.body;
    let _description = doc.build(Tag::P).text(description).child_of(body).finish();

    let placeholder = doc
        .build(Tag::Div)
        .class("ai-content-placeholder")
        .child_of(body)
        .finish();
    let _robot = doc
        .build(Tag::I)
        .class("fas")
        .class("fa-robot")
        .class("fa-2x")
        .class("mb-3")
        .child_of(placeholder)
        .finish();
    let _note = doc
        .build(Tag::P)
        .class("text-muted")
        .text(AI_PLACEHOLDER_TEXT)
        .child_of(placeholder)
        .finish();
    let papers = doc
        .build(Tag::Div)
        .class("research-papers")
        .child_of(placeholder)
        .finish();
    let _heading = doc
        .build(Tag::H5)
        .text("Related Research")
        .child_of(papers)
        .finish();
    let _related = doc
        .build(Tag::P)
        .class("text-muted")
        .text(RELATED_RESEARCH_TEXT)
        .child_of(papers)
        .finish();
    session
}

fn attach(doc: &mut Document, parent: NodeId, child: NodeId) {
    if let Err(err) = doc.append_child(parent, child) {
        tracing::warn!(error = %err, "modal.attach_failed");
    }
}

/// Active sessions, at most one per kind.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<SessionKind, ModalSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: SessionKind) -> Option<&ModalSession> {
        self.sessions.get(&kind)
    }

    /// Whether a session of `kind` is open (present and not closing).
    pub fn is_open(&self, kind: SessionKind) -> bool {
        self.get(kind).is_some_and(ModalSession::is_open)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModalSession> {
        self.sessions.values()
    }

    /// Kind of the session whose overlay contains `node`.
    pub fn session_containing(&self, doc: &Document, node: NodeId) -> Option<SessionKind> {
        self.sessions
            .values()
            .find(|s| doc.contains(s.root, node))
            .map(|s| s.kind)
    }

    /// Show `session`: append to `body`, mark visible and focus its close control.
    ///
    /// A previous session of the same kind, open or still closing, is removed
    /// from the document right away; its pending removal is dropped with it.
    pub fn open(&mut self, doc: &mut Document, session: ModalSession) {
        if let Some(previous) = self.sessions.remove(&session.kind) {
            doc.detach(previous.root);
            tracing::debug!(kind = ?previous.kind, root = %previous.root, "modal.replace");
        }
        let body = doc.body();
        attach(doc, body, session.root);
        doc.add_class(session.root, "show");
        doc.focus(session.close_button);
        tracing::debug!(kind = ?session.kind, root = %session.root, "modal.open");
        self.sessions.insert(session.kind, session);
    }

    /// Hide the session of `kind` and schedule its removal `delay` later.
    ///
    /// Input events carry no timestamp, so the deadline is fixed by the
    /// first [`Self::expire`] call after the close.
    ///
    /// Returns false when there is no open session of that kind.
    pub fn close(&mut self, doc: &mut Document, kind: SessionKind, delay: Duration) -> bool {
        let Some(session) = self.sessions.get_mut(&kind) else {
            return false;
        };
        if !session.is_open() {
            return false;
        }
        doc.remove_class(session.root, "show");
        session.state = SessionState::ClosePending { delay };
        tracing::debug!(kind = ?kind, root = %session.root, "modal.close");
        true
    }

    /// Start the timers of pending closes at `now`, then detach every
    /// closing session whose deadline is at or before `now`.
    pub fn expire(&mut self, doc: &mut Document, now: Instant) -> Vec<SessionKind> {
        for session in self.sessions.values_mut() {
            if let SessionState::ClosePending { delay } = session.state {
                session.state = SessionState::Closing {
                    remove_at: now + delay,
                };
            }
        }
        let due: Vec<SessionKind> = self
            .sessions
            .values()
            .filter(|s| matches!(s.state, SessionState::Closing { remove_at } if remove_at <= now))
            .map(|s| s.kind)
            .collect();
        for kind in &due {
            if let Some(session) = self.sessions.remove(kind) {
                let body = doc.body();
                if let Err(err) = doc.remove_child(body, session.root) {
                    tracing::warn!(error = %err, "modal.remove_failed");
                }
                tracing::debug!(kind = ?kind, root = %session.root, "modal.removed");
            }
        }
        due
    }

    /// Earliest removal deadline. Pending closes have none until the next
    /// `expire`.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sessions
            .values()
            .filter_map(|s| match s.state {
                SessionState::Closing { remove_at } => Some(remove_at),
                SessionState::Open | SessionState::ClosePending { .. } => None,
            })
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let item = doc.build(Tag::Div).class("gallery-item").child_of(body).finish();
        let _img = doc
            .build(Tag::Img)
            .attr("src", "photo.jpg")
            .child_of(item)
            .finish();
        let caption = doc
            .build(Tag::Div)
            .class("gallery-overlay")
            .child_of(item)
            .finish();
        let _text = doc.build(Tag::H5).text("Lab").child_of(caption).finish();
        (doc, item)
    }

    #[test]
    fn test_build_fullscreen_clones_media_and_caption() {
        let (mut doc, item) = gallery_doc();
        let session = build_fullscreen(&mut doc, item).unwrap();
        let children = doc.element(session.body).children().to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.element(children[0]).tag(), &Tag::Img);
        assert!(doc.has_class(children[0], "fullscreen-content"));
        assert_eq!(doc.attribute(children[0], "src"), Some("photo.jpg"));
        assert!(doc.has_class(children[1], "fullscreen-overlay"));
        assert!(!doc.has_class(children[1], "gallery-overlay"));
        assert_eq!(doc.text_content(children[1]), "Lab");
    }

    #[test]
    fn test_build_fullscreen_without_media_is_none() {
        let mut doc = Document::new();
        let item = doc.build(Tag::Div).class("gallery-item").finish();
        assert!(build_fullscreen(&mut doc, item).is_none());
    }

    #[test]
    fn test_build_topic_has_header_and_placeholder() {
        let mut doc = Document::new();
        let session = build_topic(&mut doc, "Haptics", "Touch <b>feedback</b>");
        let h3 = doc.query_in(session.root, &Selector::Tag(Tag::H3)).unwrap();
        assert_eq!(doc.element(h3).text(), "Haptics");
        let header = doc.element(session.close_button).parent().unwrap();
        assert!(doc.has_class(header, "modal-header"));
        assert!(doc.to_html(session.root).contains("Touch &lt;b&gt;feedback&lt;/b&gt;"));
        assert!(doc.text_content(session.body).contains(AI_PLACEHOLDER_TEXT));
    }

    #[test]
    fn test_open_close_expire_cycle() {
        let mut doc = Document::new();
        let mut registry = SessionRegistry::new();
        let session = build_topic(&mut doc, "T", "D");
        let root = session.root;
        registry.open(&mut doc, session);
        assert!(doc.is_connected(root));
        assert!(doc.has_class(root, "show"));

        let t0 = Instant::now();
        assert!(registry.close(&mut doc, SessionKind::Topic, CLOSE_DELAY));
        assert!(!doc.has_class(root, "show"));
        assert!(!registry.close(&mut doc, SessionKind::Topic, CLOSE_DELAY));
        assert_eq!(registry.next_deadline(), None);

        assert!(registry.expire(&mut doc, t0).is_empty());
        assert_eq!(registry.next_deadline(), Some(t0 + CLOSE_DELAY));

        assert!(registry.expire(&mut doc, t0 + Duration::from_millis(299)).is_empty());
        assert!(doc.is_connected(root));
        assert_eq!(
            registry.expire(&mut doc, t0 + CLOSE_DELAY),
            vec![SessionKind::Topic]
        );
        assert!(!doc.is_connected(root));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reopen_replaces_closing_session() {
        let mut doc = Document::new();
        let mut registry = SessionRegistry::new();
        let first = build_topic(&mut doc, "A", "a");
        let first_root = first.root;
        registry.open(&mut doc, first);
        let t0 = Instant::now();
        registry.close(&mut doc, SessionKind::Topic, CLOSE_DELAY);
        registry.expire(&mut doc, t0);

        let second = build_topic(&mut doc, "B", "b");
        let second_root = second.root;
        registry.open(&mut doc, second);
        assert!(!doc.is_connected(first_root));

        // The first session's deadline must not remove the second one.
        registry.expire(&mut doc, t0 + CLOSE_DELAY);
        assert!(doc.is_connected(second_root));
        assert!(registry.is_open(SessionKind::Topic));
    }

    #[test]
    fn test_deadline_starts_at_first_expire_after_close() {
        let mut doc = Document::new();
        let mut registry = SessionRegistry::new();
        let session = build_topic(&mut doc, "T", "D");
        let root = session.root;
        let t0 = Instant::now();
        registry.open(&mut doc, session);
        registry.expire(&mut doc, t0);

        registry.close(&mut doc, SessionKind::Topic, CLOSE_DELAY);
        let late = t0 + Duration::from_secs(10);
        assert!(registry.expire(&mut doc, late).is_empty());
        assert!(doc.is_connected(root));
        assert_eq!(registry.next_deadline(), Some(late + CLOSE_DELAY));
    }

    #[test]
    fn test_zero_delay_removes_on_first_expire() {
        let mut doc = Document::new();
        let mut registry = SessionRegistry::new();
        let session = build_topic(&mut doc, "T", "D");
        let root = session.root;
        registry.open(&mut doc, session);
        registry.close(&mut doc, SessionKind::Topic, Duration::ZERO);
        registry.expire(&mut doc, Instant::now());
        assert!(!doc.is_connected(root));
    }
}
