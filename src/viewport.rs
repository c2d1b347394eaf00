//! Viewport management for scrolling.
//!
//! The [`Viewport`] tracks the visible vertical slice of the host document
//! in CSS pixels. Intersection watches measure element layout boxes
//! against it.

/// The visible window onto the document.
///
/// # Example
///
/// ```
/// use showcase::viewport::Viewport;
///
/// let mut vp = Viewport::new(800.0, 3000.0);
/// assert_eq!(vp.visible_bounds(), (0.0, 800.0));
///
/// vp.scroll_by(250.0);
/// assert_eq!(vp.visible_bounds(), (250.0, 1050.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    height: f64,
    offset: f64,
    total_height: f64,
}

impl Viewport {
    /// Create a viewport at the top of a document.
    ///
    /// # Arguments
    ///
    /// * `height` - Visible height in pixels
    /// * `total_height` - Full scrollable document height in pixels
    pub const fn new(height: f64, total_height: f64) -> Self {
        Self {
            height,
            offset: 0.0,
            total_height,
        }
    }

    /// Current scroll offset from the document top.
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub const fn height(&self) -> f64 {
        self.height
    }

    pub const fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Top and bottom edge of the visible area.
    pub fn visible_bounds(&self) -> (f64, f64) {
        (self.offset, self.offset + self.height)
    }

    /// Visible bounds grown by `margin` pixels on both edges.
    pub fn expanded_bounds(&self, margin: f64) -> (f64, f64) {
        let (top, bottom) = self.visible_bounds();
        (top - margin, bottom + margin)
    }

    /// Scroll so that `offset` is at the top, clamped to the document.
    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset());
    }

    /// Scroll by a signed pixel delta.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.offset + delta);
    }

    /// Resize the visible area.
    pub fn resize(&mut self, height: f64) {
        self.height = height.max(0.0);
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the document height (e.g. after content reflow).
    pub fn set_total_height(&mut self, total: f64) {
        self.total_height = total.max(0.0);
        self.offset = self.offset.min(self.max_offset());
    }

    fn max_offset(&self) -> f64 {
        (self.total_height - self.height).max(0.0)
    }
}
