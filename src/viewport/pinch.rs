//! Pinch zoom.
//!
//! Scale is applied incrementally: each update multiplies the zoom by the ratio between
//! its start-relative scale and the previous update's. Panning is measured against the
//! content point under the first pinch center.

use super::{Viewport, ZoomPermit};
use crate::gesture::{Gesture, PinchDirection, PinchEventDetail, WheelDirection};
use crate::model::{FittingType, PinchPhase, Point, Size, ViewportError};
use tracing::{debug, trace};

/// Pinch bookkeeping, owned by the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchState {
    /// Current phase.
    pub phase: PinchPhase,
    /// Center used for the last applied step, in screen coordinates.
    pub center: Option<Point>,
    /// Pan since the gesture began.
    pub pan_vector: Option<Point>,
    /// Start-relative scale of the last applied step.
    pub previous_scale_ratio: f64,
    first_center: Option<Point>,
    old_center_in_content: Option<Point>,
    keep_content_centered: bool,
}

impl Default for PinchState {
    fn default() -> Self {
        Self {
            phase: PinchPhase::None,
            center: None,
            pan_vector: None,
            previous_scale_ratio: 1.0,
            first_center: None,
            old_center_in_content: None,
            keep_content_centered: false,
        }
    }
}

impl Viewport {
    /// Route a recognized gesture to the matching entry point.
    ///
    /// Pinches are ignored in presentation mode, where wheel gestures flip pages.
    pub fn dispatch_gesture(&mut self, gesture: &Gesture) -> Result<(), ViewportError> {
        match gesture {
            Gesture::PinchStart(detail) => self.pinch_zoom_start(detail),
            Gesture::PinchUpdate(detail) => self.pinch_zoom(detail),
            Gesture::PinchEnd(detail) => self.pinch_zoom_end(detail),
            Gesture::Wheel(WheelDirection::Down) => {
                self.go_to_next_page();
                Ok(())
            }
            Gesture::Wheel(WheelDirection::Up) => {
                self.go_to_previous_page();
                Ok(())
            }
        }
    }

    /// Begin a pinch centered at `detail.center`.
    ///
    /// Ignored in presentation mode; later updates of that gesture then fail with
    /// [`ViewportError::PinchNotActive`] and should be dropped by the caller.
    pub fn pinch_zoom_start(&mut self, detail: &PinchEventDetail) -> Result<(), ViewportError> {
        if self.presentation_mode {
            trace!("pinch ignored in presentation mode");
            return Ok(());
        }
        if self.pinch.phase.is_active() {
            return Err(ViewportError::PinchAlreadyActive {
                phase: self.pinch.phase,
            });
        }

        let keep_content_centered = !self.document_needs_scrollbars(self.zoom()).horizontal;
        self.pinch = PinchState {
            phase: PinchPhase::Start,
            old_center_in_content: Some(self.plugin_to_content(detail.center)),
            keep_content_centered,
            first_center: Some(detail.center),
            ..PinchState::default()
        };
        debug!(center = ?detail.center, keep_content_centered, "pinch start");
        Ok(())
    }

    /// Apply one pinch update.
    pub fn pinch_zoom(&mut self, detail: &PinchEventDetail) -> Result<(), ViewportError> {
        self.require_active_pinch()?;

        self.might_zoom(|viewport, permit| {
            viewport.pinch.phase = match detail.direction {
                Some(PinchDirection::Out) => PinchPhase::UpdateZoomOut,
                _ => PinchPhase::UpdateZoomIn,
            };

            let scale_delta = viewport.scale_delta(detail.start_scale_ratio);
            if let Some(first) = viewport.pinch.first_center {
                viewport.pinch.pan_vector = Some(detail.center.delta_to(first));
            }

            let new_zoom = viewport
                .zoom_coordinator
                .apply_browser_zoom(viewport.clamp_zoom(viewport.internal_zoom * scale_delta));
            let needs = viewport.document_needs_scrollbars(new_zoom);

            // Without horizontal scrolling, keep the content centered so the user
            // cannot zoom into the margin.
            if !needs.horizontal {
                let window = viewport.window;
                viewport.pinch.center = Some(window_center(window));
            } else {
                viewport.pinch.center = Some(detail.center);
                if viewport.pinch.keep_content_centered {
                    viewport.pinch.old_center_in_content =
                        Some(viewport.plugin_to_content(detail.center));
                    viewport.pinch.keep_content_centered = false;
                }
            }

            viewport.fitting_type = FittingType::None;
            viewport.set_pinch_zoom_internal(permit, scale_delta, detail.center);
            viewport.update_viewport();

            if let Some(ratio) = detail.start_scale_ratio {
                viewport.pinch.previous_scale_ratio = ratio;
            }
        });
        Ok(())
    }

    /// Apply the final pinch step and clear all pinch state.
    pub fn pinch_zoom_end(&mut self, detail: &PinchEventDetail) -> Result<(), ViewportError> {
        self.require_active_pinch()?;

        self.might_zoom(|viewport, permit| {
            viewport.pinch.phase = PinchPhase::End;
            let scale_delta = viewport.scale_delta(detail.start_scale_ratio);
            viewport.pinch.center = Some(detail.center);
            viewport.set_pinch_zoom_internal(permit, scale_delta, detail.center);
            viewport.update_viewport();
        });

        debug!(zoom = self.zoom(), "pinch end");
        self.pinch = PinchState::default();
        Ok(())
    }

    fn require_active_pinch(&self) -> Result<(), ViewportError> {
        match self.pinch.phase {
            PinchPhase::Start | PinchPhase::UpdateZoomIn | PinchPhase::UpdateZoomOut => Ok(()),
            phase => Err(ViewportError::PinchNotActive { phase }),
        }
    }

    /// Ratio to apply for this step. An unknown scale leaves the zoom unchanged.
    fn scale_delta(&self, start_scale_ratio: Option<f64>) -> f64 {
        match start_scale_ratio {
            Some(ratio) => ratio / self.pinch.previous_scale_ratio,
            None => 1.0,
        }
    }

    /// Scale the internal zoom by `scale_delta`, keeping the content under the first
    /// pinch center under `center`.
    fn set_pinch_zoom_internal(&mut self, _permit: &ZoomPermit, scale_delta: f64, center: Point) {
        self.internal_zoom = self.clamp_zoom(self.internal_zoom * scale_delta);

        let center_in_content = self.plugin_to_content(center);
        let old_center = self
            .pinch
            .old_center_in_content
            .unwrap_or(center_in_content);
        let delta = old_center.delta_to(center_in_content);

        let zoom = self.zoom();
        let position = self.position();
        let target = Point::new(position.x - delta.x * zoom, position.y - delta.y * zoom);

        self.content_size_changed();
        self.set_position(target);
    }
}

fn window_center(window: Size) -> Point {
    Point::new(window.width / 2.0, window.height / 2.0)
}
