//! Shared stylesheet for modals and scroll animation.

use crate::dom::{Document, NodeId, Tag};

/// Id of the injected `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "visual-modal-styles";

/// Modal and animation rules. The 0.3s transition matches the modal close delay.
pub const MODAL_STYLES: &str = r"
.fullscreen-modal,
.topic-modal {
  position: fixed;
  top: 0;
  left: 0;
  width: 100%;
  height: 100%;
  z-index: 9999;
  opacity: 0;
  visibility: hidden;
  transition: all 0.3s ease;
}

.fullscreen-modal.show,
.topic-modal.show {
  opacity: 1;
  visibility: visible;
}

.modal-backdrop {
  position: absolute;
  inset: 0;
  background: rgba(0, 0, 0, 0.9);
  display: flex;
  align-items: center;
  justify-content: center;
}

.modal-content {
  position: relative;
  max-width: 90vw;
  max-height: 90vh;
  background: white;
  border-radius: 12px;
  overflow: hidden;
}

.fullscreen-modal .modal-content {
  background: transparent;
}

.modal-close {
  position: absolute;
  top: 1rem;
  right: 1rem;
  background: rgba(0, 0, 0, 0.5);
  color: white;
  border: none;
  border-radius: 50%;
  width: 40px;
  height: 40px;
  display: flex;
  align-items: center;
  justify-content: center;
  cursor: pointer;
  z-index: 10;
  transition: background 0.3s ease;
}

.modal-close:hover {
  background: rgba(0, 0, 0, 0.7);
}

.fullscreen-content {
  max-width: 100%;
  max-height: 100%;
  object-fit: contain;
}

.fullscreen-overlay {
  position: absolute;
  bottom: 0;
  left: 0;
  right: 0;
  background: linear-gradient(transparent, rgba(0, 0, 0, 0.8));
  color: white;
  padding: 2rem;
  transform: none;
}

.topic-modal .modal-header {
  padding: 1.5rem;
  border-bottom: 1px solid #e5e7eb;
  display: flex;
  justify-content: space-between;
  align-items: center;
}

.topic-modal .modal-body {
  padding: 1.5rem;
}

.ai-content-placeholder {
  background: #f8fafc;
  border-radius: 8px;
  padding: 2rem;
  text-align: center;
  margin-top: 1.5rem;
}

.animate-on-scroll {
  opacity: 0;
  transform: translateY(30px);
  transition: all 0.6s ease;
}

.animate-on-scroll.animated {
  opacity: 1;
  transform: translateY(0);
}
";

/// Append the shared `<style>` block to `head` unless it is already present.
///
/// Returns the style element, new or existing.
pub fn inject(doc: &mut Document) -> NodeId {
    if let Some(existing) = doc.element_by_id(STYLE_ELEMENT_ID) {
        return existing;
    }
    let head = doc.head();
    let style = doc
        .build(Tag::Style)
        .attr("id", STYLE_ELEMENT_ID)
        .text(MODAL_STYLES)
        .child_of(head)
        .finish();
    tracing::debug!(node = %style, "styles.inject");
    style
}
