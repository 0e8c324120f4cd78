//! Notifications the viewport queues for its owner.

use crate::model::{LayoutOptions, PinchPhase, Point, Rect, Size};

/// Which scrollbars the zoomed document needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scrollbars {
    /// The document is wider than the window.
    pub horizontal: bool,
    /// The document is taller than the window.
    pub vertical: bool,
}

/// Zoom and pinch state captured at a before/after-zoom hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSnapshot {
    /// Effective zoom.
    pub zoom: f64,
    /// Scroll position in screen pixels.
    pub position: Point,
    /// Current pinch phase.
    pub pinch_phase: PinchPhase,
    /// Pinch center, while a pinch is in progress.
    pub pinch_center: Option<Point>,
    /// Pan accumulated since the pinch began.
    pub pinch_pan_vector: Option<Point>,
    /// Layout options of the current document.
    pub layout_options: Option<LayoutOptions>,
    /// Whether the change stems from user input rather than a resize.
    pub user_initiated: bool,
}

/// Geometry handed to the shell after every committed change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    /// Page with the largest visible fraction.
    pub most_visible_page: usize,
    /// That page's content rectangle in screen coordinates.
    pub page_screen_rect: Rect,
    /// Window size.
    pub viewport_size: Size,
    /// Scroll position.
    pub position: Point,
    /// Effective zoom.
    pub zoom: f64,
    /// Scrollbars the document currently needs.
    pub scrollbars: Scrollbars,
}

/// Ordered notifications from the viewport.
///
/// The owner drains them with [`crate::viewport::Viewport::take_events`] after every
/// call and dispatches them in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// A zoom mutation is about to happen.
    BeforeZoom(ZoomSnapshot),
    /// A zoom mutation finished.
    AfterZoom(ZoomSnapshot),
    /// The scroll position moved outside a zoom mutation.
    Scrolled(Point),
    /// Scroll, zoom or layout changed.
    Changed(ViewportSnapshot),
    /// The host should set its zoom to this value.
    BrowserZoomRequested(f64),
}
