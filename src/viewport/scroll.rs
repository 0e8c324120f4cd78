//! Scrollable content area behind the viewport.

use crate::model::{Point, Size};

/// Scroll position and zoomed content size, with the clamping a scroll container
/// applies.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScrollContent {
    scrollbar_width: f64,
    container: Size,
    content: Size,
    position: Point,
}

impl ScrollContent {
    pub(crate) fn new(container: Size, scrollbar_width: f64) -> Self {
        Self {
            scrollbar_width,
            container,
            content: Size::default(),
            position: Point::ZERO,
        }
    }

    pub(crate) fn scrollbar_width(&self) -> f64 {
        self.scrollbar_width
    }

    pub(crate) fn size(&self) -> Size {
        self.content
    }

    pub(crate) fn position(&self) -> Point {
        self.position
    }

    /// Resize the content. The current position is re-clamped to the new limits.
    pub(crate) fn set_size(&mut self, width: f64, height: f64) {
        self.content = Size::new(width, height);
        self.reclamp();
    }

    /// Resize the container. The current position is re-clamped to the new limits.
    pub(crate) fn set_container(&mut self, container: Size) {
        self.container = container;
        self.reclamp();
    }

    /// Scroll to `(x, y)`, clamped to `[0, max]` per axis. NaN coordinates become 0.
    ///
    /// Returns whether the position changed.
    pub(crate) fn scroll_to(&mut self, x: f64, y: f64) -> bool {
        let clamped = self.clamp(x, y);
        let changed = clamped != self.position;
        self.position = clamped;
        changed
    }

    fn reclamp(&mut self) {
        self.position = self.clamp(self.position.x, self.position.y);
    }

    fn clamp(&self, x: f64, y: f64) -> Point {
        let x = if x.is_nan() { 0.0 } else { x };
        let y = if y.is_nan() { 0.0 } else { y };

        let max_x = self.max_scroll(
            self.content.width,
            self.container.width,
            self.content.height > self.container.height,
        );
        let max_y = self.max_scroll(
            self.content.height,
            self.container.height,
            self.content.width > self.container.width,
        );

        // min before max: either maximum may be negative.
        Point::new(x.min(max_x).max(0.0), y.min(max_y).max(0.0))
    }

    /// May be negative when the content is smaller than the container.
    fn max_scroll(&self, content: f64, container: f64, has_scrollbar: bool) -> f64 {
        let container = if has_scrollbar {
            container - self.scrollbar_width
        } else {
            container
        };
        content - container
    }
}
