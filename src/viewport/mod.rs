//! The viewport: authoritative scroll position, zoom, rotation and page layout.
//!
//! # Coordinate spaces
//! - **Document space**: page layout units reported by the renderer, zoom independent.
//! - **Content space**: document space scaled by the effective zoom; scroll positions
//!   live here.
//! - **Screen space**: pixels relative to the top-left of the window.
//!
//! # Zoom discipline
//! Every zoom mutation runs inside [`Viewport::might_zoom`], which queues a
//! [`ViewportEvent::BeforeZoom`] hook, runs the mutation, queues
//! [`ViewportEvent::AfterZoom`] and reconciles the host zoom. The private mutators take
//! a [`ZoomPermit`] that only the wrapper hands out, so a mutation outside the wrapper
//! does not compile.
//!
//! # Notifications
//! The viewport never calls back into its owner. It queues [`ViewportEvent`]s that the
//! owner drains with [`Viewport::take_events`] and dispatches in order.

mod events;
mod fitting;
mod keys;
mod pages;
mod pinch;
mod scroll;

pub use events::{Scrollbars, ViewportEvent, ViewportSnapshot, ZoomSnapshot};
pub use keys::{Key, KeyEvent, MIN_FRACTION_TO_STEP_WHEN_PAGING, SCROLL_INCREMENT};
pub use pages::{PageShadow, PAGE_SHADOW};
pub use pinch::PinchState;

use crate::model::{
    DocumentDimensions, FittingType, LayoutOptions, PartialPoint, PinchPhase, Point, Rect, Size,
};
use crate::zoom::{ZoomCoordinator, ZoomNotification};
use scroll::ScrollContent;
use tracing::{debug, warn};

/// Zoom factors stepped through by zoom in/out, ascending.
pub const DEFAULT_PRESET_ZOOM_FACTORS: [f64; 17] = [
    0.25, 0.333, 0.5, 0.666, 0.75, 0.8, 0.9, 1.0, 1.1, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0, 5.0,
];

/// Default scrollbar thickness in pixels.
pub const DEFAULT_SCROLLBAR_WIDTH: f64 = 16.0;

/// Default height of the toolbar overlaying the top of the document.
pub const DEFAULT_TOOLBAR_HEIGHT: f64 = 56.0;

/// Fixed parameters of a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportOptions {
    /// Ascending zoom factors; the first and last bound every user zoom.
    pub preset_zoom_factors: Vec<f64>,
    /// Zoom used when a document first loads, unless fit-to-width is smaller.
    pub default_zoom: f64,
    /// Scrollbar thickness in pixels.
    pub scrollbar_width: f64,
    /// Toolbar height subtracted from page navigation outside paged modes.
    pub toolbar_height: f64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            preset_zoom_factors: DEFAULT_PRESET_ZOOM_FACTORS.to_vec(),
            default_zoom: 1.0,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            toolbar_height: DEFAULT_TOOLBAR_HEIGHT,
        }
    }
}

/// Grants access to zoom mutators. Only [`Viewport::might_zoom`] creates one.
struct ZoomPermit(());

/// Scroll and zoom state machine for one document.
#[derive(Debug, Clone)]
pub struct Viewport {
    window: Size,
    scroll: ScrollContent,
    options: ViewportOptions,
    zoom_coordinator: ZoomCoordinator,
    internal_zoom: f64,
    fitting_type: FittingType,
    document: Option<DocumentDimensions>,
    rotations: u8,
    presentation_mode: bool,
    user_initiated: bool,
    zooming: bool,
    pinch: PinchState,
    events: Vec<ViewportEvent>,
}

impl Viewport {
    /// Create a viewport for a window of the given size.
    ///
    /// An empty preset list falls back to [`DEFAULT_PRESET_ZOOM_FACTORS`].
    pub fn new(window: Size, mut options: ViewportOptions, zoom: ZoomCoordinator) -> Self {
        if options.preset_zoom_factors.is_empty() {
            warn!("empty preset zoom factor list, using defaults");
            options.preset_zoom_factors = DEFAULT_PRESET_ZOOM_FACTORS.to_vec();
        }

        Self {
            window,
            scroll: ScrollContent::new(window, options.scrollbar_width),
            options,
            zoom_coordinator: zoom,
            internal_zoom: 1.0,
            fitting_type: FittingType::None,
            document: None,
            rotations: 0,
            presentation_mode: false,
            user_initiated: true,
            zooming: false,
            pinch: PinchState::default(),
            events: Vec::new(),
        }
    }

    /// Drain queued notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Accessors =====

    /// Scroll position in content pixels.
    pub fn position(&self) -> Point {
        self.scroll.position()
    }

    /// Window size.
    pub fn size(&self) -> Size {
        self.window
    }

    /// Zoomed, rounded document size.
    pub fn content_size(&self) -> Size {
        self.scroll.size()
    }

    /// Effective zoom: the internal zoom composed with the host zoom.
    pub fn zoom(&self) -> f64 {
        self.zoom_coordinator.apply_browser_zoom(self.internal_zoom)
    }

    /// Document-controlled zoom component.
    pub fn internal_zoom(&self) -> f64 {
        self.internal_zoom
    }

    /// Ascending preset zoom factors.
    pub fn preset_zoom_factors(&self) -> &[f64] {
        &self.options.preset_zoom_factors
    }

    /// Scrollbar thickness in pixels.
    pub fn scrollbar_width(&self) -> f64 {
        self.scroll.scrollbar_width()
    }

    /// Active fitting policy.
    pub fn fitting_type(&self) -> FittingType {
        self.fitting_type
    }

    /// Current document geometry, once the renderer reported it.
    pub fn document_dimensions(&self) -> Option<&DocumentDimensions> {
        self.document.as_ref()
    }

    /// Layout options reported with the document.
    pub fn layout_options(&self) -> Option<LayoutOptions> {
        self.document.as_ref().and_then(|d| d.layout_options)
    }

    /// Number of clockwise quarter turns applied to the pages.
    pub fn clockwise_rotations(&self) -> u8 {
        self.rotations
    }

    /// Whether pages are laid out side by side.
    pub fn two_up_view_enabled(&self) -> bool {
        self.layout_options()
            .map(|options| options.two_up_view_enabled)
            .unwrap_or(false)
    }

    /// Whether presentation (full screen) mode is on.
    pub fn presentation_mode(&self) -> bool {
        self.presentation_mode
    }

    /// Full pinch bookkeeping.
    pub fn pinch(&self) -> &PinchState {
        &self.pinch
    }

    /// Phase of the current pinch.
    pub fn pinch_phase(&self) -> PinchPhase {
        self.pinch.phase
    }

    /// Center of the current pinch in screen coordinates.
    pub fn pinch_center(&self) -> Option<Point> {
        self.pinch.center
    }

    /// Pan accumulated since the current pinch began.
    pub fn pinch_pan_vector(&self) -> Option<Point> {
        self.pinch.pan_vector
    }

    /// The zoom coordinator.
    pub fn zoom_coordinator(&self) -> &ZoomCoordinator {
        &self.zoom_coordinator
    }

    // ===== Scrolling =====

    /// Scroll to `position`, clamped to the content.
    pub fn set_position(&mut self, position: Point) {
        let changed = self.scroll.scroll_to(position.x, position.y);
        if changed && !self.zooming {
            self.events.push(ViewportEvent::Scrolled(self.position()));
            self.update_viewport();
        }
    }

    /// Scroll only the axes that `point` specifies.
    pub fn scroll_to(&mut self, point: PartialPoint) {
        let mut position = self.position();
        let mut changed = false;
        if let Some(x) = point.x.filter(|x| *x != position.x) {
            position.x = x;
            changed = true;
        }
        if let Some(y) = point.y.filter(|y| *y != position.y) {
            position.y = y;
            changed = true;
        }

        if changed {
            self.set_position(position);
        }
    }

    /// Scroll by `delta`.
    pub fn scroll_by(&mut self, delta: Point) {
        let position = self.position();
        self.scroll_to(PartialPoint {
            x: Some(position.x + delta.x),
            y: Some(position.y + delta.y),
        });
    }

    // ===== Zoom =====

    /// Set the zoom, clamped to the preset range, keeping the top-left content point
    /// fixed. Clears the fitting type.
    pub fn set_zoom(&mut self, new_zoom: f64) {
        self.fitting_type = FittingType::None;
        let clamped = self.clamp_zoom(new_zoom);
        debug!(requested = new_zoom, zoom = clamped, "set zoom");
        self.might_zoom(|viewport, permit| {
            viewport.set_zoom_internal(permit, clamped);
            viewport.update_viewport();
        });
    }

    /// Step to the smallest preset strictly above the current zoom.
    pub fn zoom_in(&mut self) {
        self.might_zoom(|viewport, permit| {
            viewport.fitting_type = FittingType::None;
            let presets = &viewport.options.preset_zoom_factors;
            let current = viewport.internal_zoom;
            let next = presets
                .iter()
                .copied()
                .find(|factor| *factor > current)
                .or_else(|| presets.last().copied())
                .unwrap_or(current);
            viewport.set_zoom_internal(permit, next);
            viewport.update_viewport();
        });
    }

    /// Step to the largest preset strictly below the current zoom.
    pub fn zoom_out(&mut self) {
        self.might_zoom(|viewport, permit| {
            viewport.fitting_type = FittingType::None;
            let presets = &viewport.options.preset_zoom_factors;
            let current = viewport.internal_zoom;
            let next = presets
                .iter()
                .rev()
                .copied()
                .find(|factor| *factor < current)
                .or_else(|| presets.first().copied())
                .unwrap_or(current);
            viewport.set_zoom_internal(permit, next);
            viewport.update_viewport();
        });
    }

    /// The host zoom changed.
    pub fn on_browser_zoom_change(&mut self, new_browser_zoom: f64) {
        match self.zoom_coordinator.on_browser_zoom_change(new_browser_zoom) {
            Some(ZoomNotification::SetZoom(zoom)) => self.set_zoom(zoom),
            Some(ZoomNotification::UpdateFromBrowser { old_browser_zoom }) => {
                self.update_zoom_from_browser_change(old_browser_zoom)
            }
            Some(ZoomNotification::RequestBrowserZoom(zoom)) => {
                self.events.push(ViewportEvent::BrowserZoomRequested(zoom))
            }
            None => {}
        }
    }

    /// The host applied a zoom previously requested through
    /// [`ViewportEvent::BrowserZoomRequested`].
    pub fn on_browser_zoom_applied(&mut self, applied_zoom: f64) {
        let current = self.zoom();
        if let Some(ZoomNotification::RequestBrowserZoom(zoom)) = self
            .zoom_coordinator
            .on_browser_zoom_applied(applied_zoom, current)
        {
            self.events.push(ViewportEvent::BrowserZoomRequested(zoom));
        }
    }

    fn update_zoom_from_browser_change(&mut self, old_browser_zoom: f64) {
        self.might_zoom(|viewport, _permit| {
            let old_zoom = old_browser_zoom * viewport.internal_zoom;
            let position = viewport.position();
            let anchor = Point::new(position.x / old_zoom, position.y / old_zoom);
            viewport.content_size_changed();
            let new_zoom = viewport.zoom();
            viewport.set_position(Point::new(anchor.x * new_zoom, anchor.y * new_zoom));
            viewport.update_viewport();
        });
    }

    // ===== Layout =====

    /// Rotate the pages a quarter turn clockwise. Returns the new rotation count.
    ///
    /// Page geometry is unchanged until the renderer reports new dimensions.
    pub fn rotate_clockwise(&mut self) -> u8 {
        self.rotations = (self.rotations + 1) % 4;
        self.rotations
    }

    /// Rotate the pages a quarter turn counterclockwise. Returns the new rotation count.
    pub fn rotate_counterclockwise(&mut self) -> u8 {
        self.rotations = (self.rotations + 3) % 4;
        self.rotations
    }

    /// Enter or leave presentation mode.
    pub fn set_presentation_mode(&mut self, enabled: bool) {
        self.presentation_mode = enabled;
    }

    /// Ingest document geometry from the renderer.
    ///
    /// The first call picks the initial zoom (the smaller of the default zoom and the
    /// fit-to-width zoom) and scrolls to the top. Later calls keep the zoom intent and
    /// re-apply the fitting type.
    pub fn set_document_dimensions(&mut self, dimensions: DocumentDimensions) {
        self.might_zoom(|viewport, permit| {
            let initial = viewport.document.is_none();
            if let Some(options) = dimensions.layout_options {
                viewport.rotations = options.default_page_orientation % 4;
            }
            debug!(
                pages = dimensions.page_count(),
                width = dimensions.width,
                height = dimensions.height,
                initial,
                "document dimensions"
            );
            viewport.document = Some(dimensions);

            if initial {
                let fit = viewport.fit_to_width_zoom();
                let zoom = viewport.options.default_zoom.min(fit);
                viewport.set_zoom_internal(permit, zoom);
                viewport.set_position(Point::ZERO);
            }
            viewport.content_size_changed();
            viewport.resize_internal();
        });
    }

    /// The window was resized.
    pub fn resize(&mut self, window: Size) {
        self.window = window;
        let before = self.position();
        self.scroll.set_container(window);
        if self.position() != before {
            self.events.push(ViewportEvent::Scrolled(self.position()));
        }

        self.user_initiated = false;
        self.resize_internal();
        self.user_initiated = true;
    }

    fn resize_internal(&mut self) {
        // Entering full screen forces fit-to-height.
        if self.presentation_mode {
            self.fitting_type = FittingType::FitToHeight;
        }

        match self.fitting_type {
            FittingType::FitToPage => self.fit_to_page_internal(false),
            FittingType::FitToWidth => self.fit_to_width(),
            FittingType::FitToHeight => self.fit_to_height_internal(self.presentation_mode),
            FittingType::None if self.internal_zoom == 0.0 => self.fit_to_none(),
            FittingType::None => self.update_viewport(),
        }
    }

    // ===== Internals =====

    fn clamp_zoom(&self, factor: f64) -> f64 {
        let presets = &self.options.preset_zoom_factors;
        match (presets.first(), presets.last()) {
            (Some(min), Some(max)) => factor.min(*max).max(*min),
            _ => factor,
        }
    }

    /// Run `f` as a zoom mutation.
    fn might_zoom<R>(&mut self, f: impl FnOnce(&mut Self, &ZoomPermit) -> R) -> R {
        self.events
            .push(ViewportEvent::BeforeZoom(self.zoom_snapshot()));

        let was_zooming = std::mem::replace(&mut self.zooming, true);
        let result = f(self, &ZoomPermit(()));
        self.zooming = was_zooming;

        self.events
            .push(ViewportEvent::AfterZoom(self.zoom_snapshot()));

        let zoom = self.zoom();
        if let Some(ZoomNotification::RequestBrowserZoom(requested)) =
            self.zoom_coordinator.on_pdf_zoom_change(zoom)
        {
            self.events
                .push(ViewportEvent::BrowserZoomRequested(requested));
        }
        result
    }

    /// Set the internal zoom, keeping the content point at the window's top-left fixed.
    fn set_zoom_internal(&mut self, _permit: &ZoomPermit, new_zoom: f64) {
        let zoom = self.zoom();
        let position = self.position();
        let anchor = Point::new(position.x / zoom, position.y / zoom);

        self.internal_zoom = new_zoom;
        self.content_size_changed();

        let zoom = self.zoom();
        self.set_position(Point::new(anchor.x * zoom, anchor.y * zoom));
    }

    fn content_size_changed(&mut self) {
        if let Some(size) = self.zoomed_document_dimensions(self.zoom()) {
            self.scroll.set_size(size.width, size.height);
        }
    }

    /// Zoomed document size, rounded the way the renderer lays out.
    fn zoomed_document_dimensions(&self, zoom: f64) -> Option<Size> {
        self.document.as_ref().map(|document| {
            Size::new(
                (document.width * zoom).round(),
                (document.height * zoom).round(),
            )
        })
    }

    /// Visible region in document units. All zero at zoom 0 (a hidden frame).
    fn viewport_rect(&self) -> Rect {
        let zoom = self.zoom();
        if zoom == 0.0 {
            return Rect::default();
        }
        let position = self.position();
        Rect::new(
            position.x / zoom,
            position.y / zoom,
            self.window.width / zoom,
            self.window.height / zoom,
        )
    }

    /// Screen point to document point.
    fn plugin_to_content(&self, point: Point) -> Point {
        let zoom = self.zoom();
        let position = self.position();
        Point::new((point.x + position.x) / zoom, (point.y + position.y) / zoom)
    }

    fn zoom_snapshot(&self) -> ZoomSnapshot {
        ZoomSnapshot {
            zoom: self.zoom(),
            position: self.position(),
            pinch_phase: self.pinch.phase,
            pinch_center: self.pinch.center,
            pinch_pan_vector: self.pinch.pan_vector,
            layout_options: self.layout_options(),
            user_initiated: self.user_initiated,
        }
    }

    /// Geometry summary for the shell. `None` until a document is loaded.
    pub fn snapshot(&self) -> Option<ViewportSnapshot> {
        self.document.as_ref()?;
        let most_visible_page = self.most_visible_page();
        Some(ViewportSnapshot {
            most_visible_page,
            page_screen_rect: self.page_screen_rect(most_visible_page),
            viewport_size: self.window,
            position: self.position(),
            zoom: self.zoom(),
            scrollbars: self.document_has_scrollbars(),
        })
    }

    fn update_viewport(&mut self) {
        if let Some(snapshot) = self.snapshot() {
            self.events.push(ViewportEvent::Changed(snapshot));
        }
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
