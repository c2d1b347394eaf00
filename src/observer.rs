//! Intersection watches.
//!
//! A watch holds a set of observed elements and reports which of them
//! currently intersect the viewport. Only the vertical axis is modelled:
//! pages scroll vertically and every observed element spans the content
//! column.

use crate::dom::{Document, LayoutBox, NodeId};
use crate::viewport::Viewport;

/// Root margin and visibility threshold for a watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Pixels added above and below the viewport before testing overlap
    pub root_margin: f64,
    /// Fraction of the element that must be visible (0.0 = any contact)
    pub threshold: f64,
}

impl WatchOptions {
    /// Lazy media: start loading 50px before the element scrolls in.
    pub const LAZY: Self = Self {
        root_margin: 50.0,
        threshold: 0.0,
    };

    /// Scroll animation: trigger once 10% of the element is visible.
    pub const ANIMATE: Self = Self {
        root_margin: 0.0,
        threshold: 0.1,
    };
}

/// Visible fraction of `layout` inside the viewport grown by `margin`.
///
/// Returns `None` when the element does not touch the area at all. An
/// element whose edge just touches the area has ratio `0.0`; a zero-height
/// element inside the area has ratio `1.0`.
pub fn intersection_ratio(layout: LayoutBox, viewport: &Viewport, margin: f64) -> Option<f64> {
    let (low, high) = viewport.expanded_bounds(margin);
    if layout.height <= 0.0 {
        return (layout.top >= low && layout.top <= high).then_some(1.0);
    }
    let overlap = layout.bottom().min(high) - layout.top.max(low);
    if overlap < 0.0 {
        return None;
    }
    Some((overlap / layout.height).min(1.0))
}

/// Whether `layout` counts as intersecting under `options`.
pub fn is_intersecting(layout: LayoutBox, viewport: &Viewport, options: WatchOptions) -> bool {
    match intersection_ratio(layout, viewport, options.root_margin) {
        None => false,
        Some(_) if options.threshold <= 0.0 => true,
        Some(ratio) => ratio >= options.threshold,
    }
}

/// A set of observed elements sharing one [`WatchOptions`].
#[derive(Debug, Clone)]
pub struct IntersectionWatch {
    options: WatchOptions,
    targets: Vec<NodeId>,
}

impl IntersectionWatch {
    pub const fn new(options: WatchOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub const fn options(&self) -> WatchOptions {
        self.options
    }

    /// Start observing `id`. Observing twice is a no-op.
    pub fn observe(&mut self, id: NodeId) {
        if !self.targets.contains(&id) {
            self.targets.push(id);
        }
    }

    /// Stop observing `id`.
    pub fn unobserve(&mut self, id: NodeId) {
        self.targets.retain(|t| *t != id);
    }

    pub fn is_observing(&self, id: NodeId) -> bool {
        self.targets.contains(&id)
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Observed, connected targets that currently intersect, in observation order.
    pub fn intersecting(&self, doc: &Document, viewport: &Viewport) -> Vec<NodeId> {
        self.targets
            .iter()
            .copied()
            .filter(|id| doc.is_connected(*id))
            .filter(|id| is_intersecting(doc.element(*id).layout(), viewport, self.options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Tag;

    fn viewport_at(offset: f64) -> Viewport {
        let mut vp = Viewport::new(600.0, 5000.0);
        vp.scroll_to(offset);
        vp
    }

    #[test]
    fn test_lazy_margin_pre_triggers_below_fold() {
        let vp = viewport_at(0.0);
        // Starts 40px below the fold: outside the viewport, inside the margin.
        let layout = LayoutBox::new(640.0, 200.0);
        assert!(is_intersecting(layout, &vp, WatchOptions::LAZY));
        assert!(!is_intersecting(
            layout,
            &vp,
            WatchOptions {
                root_margin: 0.0,
                threshold: 0.0
            }
        ));
    }

    #[test]
    fn test_lazy_margin_does_not_reach_far_elements() {
        let vp = viewport_at(0.0);
        assert!(!is_intersecting(
            LayoutBox::new(700.0, 100.0),
            &vp,
            WatchOptions::LAZY
        ));
    }

    #[test]
    fn test_edge_contact_counts_for_zero_threshold() {
        let vp = viewport_at(0.0);
        assert_eq!(
            intersection_ratio(LayoutBox::new(650.0, 100.0), &vp, 50.0),
            Some(0.0)
        );
        assert!(is_intersecting(
            LayoutBox::new(650.0, 100.0),
            &vp,
            WatchOptions::LAZY
        ));
    }

    #[test]
    fn test_animate_threshold_requires_ten_percent() {
        let vp = viewport_at(0.0);
        // 5% visible
        assert!(!is_intersecting(
            LayoutBox::new(590.0, 200.0),
            &vp,
            WatchOptions::ANIMATE
        ));
        // 10% visible
        assert!(is_intersecting(
            LayoutBox::new(580.0, 200.0),
            &vp,
            WatchOptions::ANIMATE
        ));
    }

    #[test]
    fn test_zero_height_element_inside_viewport() {
        let vp = viewport_at(0.0);
        assert_eq!(
            intersection_ratio(LayoutBox::new(100.0, 0.0), &vp, 0.0),
            Some(1.0)
        );
        assert_eq!(intersection_ratio(LayoutBox::new(900.0, 0.0), &vp, 0.0), None);
    }

    #[test]
    fn test_watch_observe_is_idempotent() {
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.build(Tag::Img).child_of(body).finish();
        let mut watch = IntersectionWatch::new(WatchOptions::LAZY);
        watch.observe(id);
        watch.observe(id);
        assert_eq!(watch.len(), 1);
        watch.unobserve(id);
        assert!(watch.is_empty());
    }

    #[test]
    fn test_watch_ignores_detached_targets() {
        let mut doc = Document::new();
        let id = doc.build(Tag::Img).layout(0.0, 100.0).finish();
        let mut watch = IntersectionWatch::new(WatchOptions::LAZY);
        watch.observe(id);
        assert!(watch.intersecting(&doc, &viewport_at(0.0)).is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ratio_is_a_fraction(
                top in -1000.0..6000.0f64,
                height in 0.0..3000.0f64,
                offset in 0.0..5000.0f64,
                margin in 0.0..200.0f64,
            ) {
                let vp = viewport_at(offset);
                if let Some(ratio) = intersection_ratio(LayoutBox::new(top, height), &vp, margin) {
                    prop_assert!((0.0..=1.0).contains(&ratio));
                }
            }

            #[test]
            fn fully_visible_elements_always_intersect(
                offset in 0.0..4000.0f64,
                inset in 0.0..300.0f64,
                height in 0.0..300.0f64,
            ) {
                let vp = viewport_at(offset);
                let layout = LayoutBox::new(vp.offset() + inset, height);
                prop_assert!(is_intersecting(layout, &vp, WatchOptions::LAZY));
                prop_assert!(is_intersecting(layout, &vp, WatchOptions::ANIMATE));
            }
        }
    }
}
