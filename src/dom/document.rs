//! Arena-backed document tree.

use thiserror::Error;

use super::Selector;
use super::types::{Element, HostCapabilities, LayoutBox, NodeId, ReadyState, Tag};

/// Errors raised by tree mutations and media calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("cannot insert {node} into its own subtree")]
    HierarchyRequest { node: NodeId },
    #[error("playback of {0} was rejected by the host")]
    PlaybackRejected(NodeId),
}

/// The host document.
///
/// Nodes are never freed: a removed subtree stays in the arena, detached
/// from `head`/`body`, the same way a script can keep a reference to a
/// removed DOM node. `NodeId`s from another document are a caller bug and
/// panic on lookup.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    head: NodeId,
    body: NodeId,
    ready_state: ReadyState,
    focused: Option<NodeId>,
    capabilities: HostCapabilities,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty, fully parsed document with `head` and `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            head: NodeId(0),
            body: NodeId(0),
            ready_state: ReadyState::Complete,
            focused: None,
            capabilities: HostCapabilities::default(),
        };
        doc.head = doc.create_element(Tag::Head);
        doc.body = doc.create_element(Tag::Body);
        doc
    }

    #[must_use]
    pub const fn with_ready_state(mut self, ready_state: ReadyState) -> Self {
        self.ready_state = ready_state;
        self
    }

    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub const fn head(&self) -> NodeId {
        self.head
    }

    pub const fn body(&self) -> NodeId {
        self.body
    }

    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub const fn set_ready_state(&mut self, ready_state: ReadyState) {
        self.ready_state = ready_state;
    }

    pub const fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.index()]
    }

    pub fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.index()]
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        #[allow(clippy::cast_possible_truncation)]
        // A page never comes close to u32::MAX nodes.
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Element::new(tag));
        id
    }

    /// Create a detached element and configure it fluently.
    pub fn build(&mut self, tag: Tag) -> ElementBuilder<'_> {
        let id = self.create_element(tag);
        ElementBuilder { doc: self, id }
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    ///
    /// # Errors
    /// Returns [`DomError::HierarchyRequest`] if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { node: child });
        }
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Insert `node` into `parent` right before `reference`.
    ///
    /// # Errors
    /// Fails if `reference` is not a child of `parent` or the insert would create a cycle.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        if self.element(reference).parent != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        if self.contains(node, parent) {
            return Err(DomError::HierarchyRequest { node });
        }
        self.detach(node);
        let children = &mut self.nodes[parent.index()].children;
        let pos = children
            .iter()
            .position(|c| *c == reference)
            .unwrap_or(children.len());
        children.insert(pos, node);
        self.nodes[node.index()].parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from `parent`.
    ///
    /// # Errors
    /// Returns [`DomError::NotAChild`] if `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.element(child).parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Detach `id` from its parent, if any. Focus inside the subtree is dropped.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|c| *c != id);
        }
        if self.focused.is_some_and(|f| self.contains(id, f)) {
            self.focused = None;
        }
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.element(id).parent;
        }
        false
    }

    /// Whether `id` is reachable from `head` or `body`.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.head, id) || self.contains(self.body, id)
    }

    /// Nearest inclusive ancestor of `id` matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if selector.matches(self.element(node)) {
                return Some(node);
            }
            current = self.element(node).parent;
        }
        None
    }

    /// Descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.element(root).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.element(id).children.iter().rev().copied());
        }
        out
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let mut out = self.query_all_in(self.head, selector);
        out.extend(self.query_all_in(self.body, selector));
        out
    }

    /// Descendants of `root` matching `selector`, in document order.
    pub fn query_all_in(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| selector.matches(self.element(*id)))
            .collect()
    }

    /// First descendant of `root` matching `selector`.
    pub fn query_in(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| selector.matches(self.element(*id)))
    }

    /// Connected element with the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_all(&Selector::id(id)).into_iter().next()
    }

    /// Own text plus the text of all descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.element(id).text.clone();
        for node in self.descendants(id) {
            out.push_str(&self.element(node).text);
        }
        out
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.index()].text = text.into();
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id.index()].add_class(class);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id.index()].remove_class(class);
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).has_class(class)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[id.index()].set_attribute(name, value);
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.nodes[id.index()].remove_attribute(name)
    }

    pub fn set_layout(&mut self, id: NodeId, top: f64, height: f64) {
        self.nodes[id.index()].layout = LayoutBox::new(top, height);
    }

    /// Copy `id` into a new detached node.
    ///
    /// Classes, attributes and text are copied; with `deep` the children are
    /// cloned recursively. Playback state is not part of the markup and starts
    /// fresh, except that an image already in the cache stays complete.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> NodeId {
        let source = self.element(id).clone();
        let copy = self.create_element(source.tag.clone());
        {
            let el = &mut self.nodes[copy.index()];
            el.classes = source.classes;
            el.attributes = source.attributes;
            el.text = source.text;
            el.layout = source.layout;
            el.media.complete = source.media.complete;
        }
        if deep {
            for child in source.children {
                let child_copy = self.clone_node(child, true);
                self.nodes[child_copy.index()].parent = Some(copy);
                self.nodes[copy.index()].children.push(child_copy);
            }
        }
        copy
    }

    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub const fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    /// Assign a media source. Images restart loading.
    pub fn set_src(&mut self, id: NodeId, src: &str) {
        let el = &mut self.nodes[id.index()];
        el.set_attribute("src", src);
        el.media.src_writes += 1;
        if el.tag == Tag::Img {
            el.media.complete = false;
        }
    }

    /// Reload a video element from its current source.
    pub fn load(&mut self, id: NodeId) {
        let media = &mut self.nodes[id.index()].media;
        media.load_calls += 1;
        media.playing = false;
        media.current_time = 0.0;
    }

    /// Start playback.
    ///
    /// # Errors
    /// Returns [`DomError::PlaybackRejected`] when the host disallows autoplay.
    pub fn play(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.capabilities.autoplay {
            return Err(DomError::PlaybackRejected(id));
        }
        self.nodes[id.index()].media.playing = true;
        Ok(())
    }

    pub fn pause(&mut self, id: NodeId) {
        self.nodes[id.index()].media.playing = false;
    }

    pub fn set_current_time(&mut self, id: NodeId, seconds: f64) {
        self.nodes[id.index()].media.current_time = seconds;
    }

    /// Record that the host finished (or restarted) loading an image.
    pub fn set_complete(&mut self, id: NodeId, complete: bool) {
        self.nodes[id.index()].media.complete = complete;
    }

    /// Serialize the subtree rooted at `id` as HTML.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let el = self.element(id);
        let name = el.tag.name();
        out.push('<');
        out.push_str(name);
        if !el.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape(&el.classes.join(" "), true));
            out.push('"');
        }
        for (key, value) in &el.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value, true));
            out.push('"');
        }
        out.push('>');
        if el.tag.is_void() {
            return;
        }
        if el.tag == Tag::Style {
            out.push_str(&el.text);
        } else {
            out.push_str(&escape(&el.text, false));
        }
        for child in &el.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fluent construction of a new element.
pub struct ElementBuilder<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl ElementBuilder<'_> {
    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.doc.add_class(self.id, class);
        self
    }

    #[must_use]
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.doc.set_attribute(self.id, name, value);
        self
    }

    #[must_use]
    pub fn text(self, text: &str) -> Self {
        self.doc.set_text(self.id, text);
        self
    }

    #[must_use]
    pub fn layout(self, top: f64, height: f64) -> Self {
        self.doc.set_layout(self.id, top, height);
        self
    }

    #[must_use]
    pub fn complete(self) -> Self {
        self.doc.set_complete(self.id, true);
        self
    }

    /// Append the new element to `parent`.
    #[must_use]
    pub fn child_of(self, parent: NodeId) -> Self {
        // A freshly built node has no children, so it cannot contain `parent`
        // unless `parent` was itself built under it.
        if let Err(err) = self.doc.append_child(parent, self.id) {
            tracing::warn!(error = %err, "dom.build.append_failed");
        }
        self
    }

    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub const fn finish(self) -> NodeId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.build(Tag::Div).class("card").child_of(body).finish();
        let img = doc
            .build(Tag::Img)
            .attr("data-lazy-src", "a.png")
            .child_of(card)
            .finish();
        (doc, card, img)
    }

    #[test]
    fn test_new_document_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.element(doc.head()).tag(), &Tag::Head);
        assert_eq!(doc.element(doc.body()).tag(), &Tag::Body);
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_append_child_moves_node() {
        let (mut doc, card, img) = sample();
        let body = doc.body();
        let other = doc.build(Tag::Div).child_of(body).finish();
        doc.append_child(other, img).unwrap();
        assert!(doc.element(card).children().is_empty());
        assert_eq!(doc.element(img).parent(), Some(other));
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (mut doc, card, img) = sample();
        let err = doc.append_child(img, card).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { node: card });
    }

    #[test]
    fn test_remove_child_requires_parent_relation() {
        let (mut doc, card, img) = sample();
        let body = doc.body();
        assert!(doc.remove_child(body, img).is_err());
        doc.remove_child(card, img).unwrap();
        assert!(!doc.is_connected(img));
        assert!(doc.remove_child(card, img).is_err());
    }

    #[test]
    fn test_query_all_is_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.build(Tag::Div).class("x").child_of(body).finish();
        let b = doc.build(Tag::Div).class("x").child_of(a).finish();
        let c = doc.build(Tag::Div).class("x").child_of(body).finish();
        assert_eq!(doc.query_all(&Selector::class("x")), vec![a, b, c]);
    }

    #[test]
    fn test_query_all_skips_detached_nodes() {
        let mut doc = Document::new();
        let _loose = doc.build(Tag::Div).class("x").finish();
        assert!(doc.query_all(&Selector::class("x")).is_empty());
    }

    #[test]
    fn test_closest_includes_self() {
        let (doc, card, img) = sample();
        assert_eq!(doc.closest(img, &Selector::class("card")), Some(card));
        assert_eq!(doc.closest(card, &Selector::class("card")), Some(card));
        assert_eq!(doc.closest(img, &Selector::class("missing")), None);
    }

    #[test]
    fn test_clone_node_deep_copies_markup_not_playback() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrap = doc.build(Tag::Div).class("wrap").child_of(body).finish();
        let video = doc
            .build(Tag::Video)
            .attr("src", "clip.mp4")
            .child_of(wrap)
            .finish();
        doc.play(video).unwrap();
        doc.set_current_time(video, 4.0);

        let copy = doc.clone_node(wrap, true);
        assert!(!doc.is_connected(copy));
        let copied_video = doc.element(copy).children()[0];
        assert_ne!(copied_video, video);
        assert_eq!(doc.attribute(copied_video, "src"), Some("clip.mp4"));
        assert!(!doc.element(copied_video).media().playing);
        assert!(doc.element(video).media().playing);
    }

    #[test]
    fn test_detach_clears_focus_inside_subtree() {
        let (mut doc, card, img) = sample();
        doc.focus(img);
        doc.detach(card);
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn test_play_rejected_without_autoplay() {
        let mut doc = Document::new().with_capabilities(HostCapabilities {
            intersection_observer: true,
            autoplay: false,
        });
        let body = doc.body();
        let video = doc.build(Tag::Video).child_of(body).finish();
        assert_eq!(doc.play(video), Err(DomError::PlaybackRejected(video)));
        assert!(!doc.element(video).media().playing);
    }

    #[test]
    fn test_insert_before_places_node() {
        let (mut doc, card, img) = sample();
        let wrapper = doc.create_element(Tag::Div);
        doc.insert_before(card, wrapper, img).unwrap();
        assert_eq!(doc.element(card).children(), &[wrapper, img]);
    }

    #[test]
    fn test_to_html_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let p = doc
            .build(Tag::P)
            .class("note")
            .attr("title", "a \"quote\"")
            .text("1 < 2 & 3")
            .finish();
        assert_eq!(
            doc.to_html(p),
            "<p class=\"note\" title=\"a &quot;quote&quot;\">1 &lt; 2 &amp; 3</p>"
        );
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let div = doc.build(Tag::Div).text("a").finish();
        let _b = doc.build(Tag::Span).text("b").child_of(div).finish();
        assert_eq!(doc.text_content(div), "ab");
    }
}
