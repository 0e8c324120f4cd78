//! Composition of the document zoom with the host (browser) zoom.
//!
//! The effective zoom the viewport lays out with is the product of an internal,
//! document-controlled factor and an external factor owned by the host. How the two
//! interact depends on the [`ZoomBehavior`] the host picked.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Browser and document zooms closer than this are considered equal.
pub const MIN_ZOOM_DELTA: f64 = 0.01;

/// How the viewer reacts to host zoom changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomBehavior {
    /// Host zoom is fixed at its initial value and never synchronized.
    #[default]
    Inactive,
    /// The document zoom and the host zoom are kept equal in both directions.
    Manage,
    /// The host zoom scales the document; the document never changes it.
    PropagateParent,
}

/// Action the viewport must take after a zoom change on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomNotification {
    /// Set the document zoom to this value.
    SetZoom(f64),
    /// The host zoom changed underneath the document; rescale the scroll position.
    UpdateFromBrowser {
        /// The host zoom in effect before the change.
        old_browser_zoom: f64,
    },
    /// Ask the host to set its zoom to this value.
    RequestBrowserZoom(f64),
}

/// Tracks the external zoom component and reconciles it with the document zoom.
#[derive(Debug, Clone)]
pub struct ZoomCoordinator {
    behavior: ZoomBehavior,
    browser_zoom: f64,
    changing_browser_zoom: bool,
}

impl Default for ZoomCoordinator {
    fn default() -> Self {
        Self::new(ZoomBehavior::Inactive, 1.0)
    }
}

impl ZoomCoordinator {
    /// Create a coordinator with the host's current zoom.
    pub fn new(behavior: ZoomBehavior, initial_browser_zoom: f64) -> Self {
        Self {
            behavior,
            browser_zoom: initial_browser_zoom,
            changing_browser_zoom: false,
        }
    }

    /// The configured behavior.
    pub fn behavior(&self) -> ZoomBehavior {
        self.behavior
    }

    /// The last known host zoom.
    pub fn browser_zoom(&self) -> f64 {
        self.browser_zoom
    }

    /// Combine an internal zoom with the host zoom.
    ///
    /// In [`ZoomBehavior::Manage`] the host zoom mirrors the document zoom, so the
    /// internal zoom is already the effective zoom.
    pub fn apply_browser_zoom(&self, internal_zoom: f64) -> f64 {
        match self.behavior {
            ZoomBehavior::Manage => internal_zoom,
            _ => self.browser_zoom * internal_zoom,
        }
    }

    /// Strip the host zoom from an effective zoom.
    pub fn internal_zoom_component(&self, zoom: f64) -> f64 {
        match self.behavior {
            ZoomBehavior::Manage => zoom,
            _ => zoom / self.browser_zoom,
        }
    }

    /// The host reported a new zoom level.
    pub fn on_browser_zoom_change(&mut self, new_zoom: f64) -> Option<ZoomNotification> {
        match self.behavior {
            ZoomBehavior::Inactive => None,
            ZoomBehavior::Manage => {
                // Our own request is in flight; its completion reconciles both sides.
                if self.changing_browser_zoom || zooms_equal(self.browser_zoom, new_zoom) {
                    return None;
                }
                debug!(new_zoom, "browser zoom changed, following");
                self.browser_zoom = new_zoom;
                Some(ZoomNotification::SetZoom(new_zoom))
            }
            ZoomBehavior::PropagateParent => {
                let old_browser_zoom = self.browser_zoom;
                self.browser_zoom = new_zoom;
                debug!(old_browser_zoom, new_zoom, "parent zoom propagated");
                Some(ZoomNotification::UpdateFromBrowser { old_browser_zoom })
            }
        }
    }

    /// The document zoom changed to `viewport_zoom`.
    pub fn on_pdf_zoom_change(&mut self, viewport_zoom: f64) -> Option<ZoomNotification> {
        if self.behavior != ZoomBehavior::Manage
            || self.changing_browser_zoom
            || zooms_equal(self.browser_zoom, viewport_zoom)
        {
            return None;
        }
        self.changing_browser_zoom = true;
        debug!(viewport_zoom, "requesting browser zoom");
        Some(ZoomNotification::RequestBrowserZoom(viewport_zoom))
    }

    /// The host finished applying a [`ZoomNotification::RequestBrowserZoom`].
    ///
    /// The document zoom may have moved again while the request was in flight, so the
    /// current `viewport_zoom` is re-checked and a follow-up request may be returned.
    pub fn on_browser_zoom_applied(
        &mut self,
        applied_zoom: f64,
        viewport_zoom: f64,
    ) -> Option<ZoomNotification> {
        if self.behavior != ZoomBehavior::Manage {
            return None;
        }
        self.browser_zoom = applied_zoom;
        self.changing_browser_zoom = false;
        self.on_pdf_zoom_change(viewport_zoom)
    }
}

fn zooms_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= MIN_ZOOM_DELTA
}
