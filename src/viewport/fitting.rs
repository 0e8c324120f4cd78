//! Fit-to-page, fit-to-width and fit-to-height.
//!
//! A fit zoom is computed in at most two passes: once against the bare window, and if
//! that zoom needs a scrollbar, once more against the window minus the scrollbars it
//! would introduce. The second result is used even if it changes which scrollbars are
//! needed.

use super::{Scrollbars, Viewport};
use crate::model::{FittingType, Point, Size};
use tracing::debug;

/// Which page extents a fit must keep inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FitAxes {
    Width,
    Height,
    Both,
}

/// Zoom that fits `page` inside `window` along `axes`.
///
/// Never negative. A page with no extent along a fitted axis yields 0.
pub(crate) fn fitting_zoom_for(axes: FitAxes, window: Size, page: Size) -> f64 {
    let ratio = |available: f64, extent: f64| {
        if extent > 0.0 {
            available / extent
        } else {
            0.0
        }
    };
    let zoom_width = ratio(window.width, page.width);
    let zoom_height = ratio(window.height, page.height);

    let zoom = match axes {
        FitAxes::Width => zoom_width,
        FitAxes::Height => zoom_height,
        FitAxes::Both => zoom_width.min(zoom_height),
    };
    if zoom.is_finite() {
        zoom.max(0.0)
    } else {
        0.0
    }
}

impl Viewport {
    /// Scrollbars the document would need at effective `zoom`.
    pub fn document_needs_scrollbars(&self, zoom: f64) -> Scrollbars {
        match self.zoomed_document_dimensions(zoom) {
            Some(zoomed) => Scrollbars {
                horizontal: zoomed.width > self.window.width,
                vertical: zoomed.height > self.window.height,
            },
            None => Scrollbars::default(),
        }
    }

    /// Scrollbars the document needs at the current zoom.
    pub fn document_has_scrollbars(&self) -> Scrollbars {
        self.document_needs_scrollbars(self.zoom())
    }

    /// Internal zoom that fits `page` along `axes`, accounting for scrollbars the fit
    /// itself introduces.
    pub(crate) fn compute_fitting_zoom(&self, page: Size, axes: FitAxes) -> f64 {
        let zoom = fitting_zoom_for(axes, self.window, page);
        let mut needs = self.document_needs_scrollbars(zoom);
        if !needs.horizontal && !needs.vertical {
            return self.zoom_coordinator.internal_zoom_component(zoom);
        }

        let scrollbar = self.scroll.scrollbar_width();
        if let Some(zoomed) = self.zoomed_document_dimensions(zoom) {
            // Adding one scrollbar may force the other.
            if needs.horizontal && zoomed.height > self.window.height - scrollbar {
                needs.vertical = true;
            }
            if needs.vertical && zoomed.width > self.window.width - scrollbar {
                needs.horizontal = true;
            }
        }

        let mut available = self.window;
        if needs.horizontal {
            available.height -= scrollbar;
        }
        if needs.vertical {
            available.width -= scrollbar;
        }

        let zoom = fitting_zoom_for(axes, available, page);
        self.zoom_coordinator.internal_zoom_component(zoom)
    }

    /// Fit-to-width zoom for the whole document, 0 without a document.
    pub(crate) fn fit_to_width_zoom(&self) -> f64 {
        match &self.document {
            Some(document) => self.compute_fitting_zoom(
                Size::new(document.width, document.height),
                FitAxes::Width,
            ),
            None => 0.0,
        }
    }

    /// Apply a fitting policy chosen by the user.
    pub fn set_fitting_type(&mut self, fitting_type: FittingType) {
        match fitting_type {
            FittingType::None => self.fit_to_none(),
            FittingType::FitToPage => self.fit_to_page(),
            FittingType::FitToWidth => self.fit_to_width(),
            FittingType::FitToHeight => self.fit_to_height(),
        }
    }

    /// Zoom so the widest page fills the window width.
    pub fn fit_to_width(&mut self) {
        self.might_zoom(|viewport, permit| {
            viewport.fitting_type = FittingType::FitToWidth;
            if viewport.document.is_none() {
                return;
            }
            let zoom = viewport.fit_to_width_zoom();
            debug!(zoom, "fit to width");
            viewport.set_zoom_internal(permit, zoom);
            viewport.update_viewport();
        });
    }

    /// Zoom so the most visible page fills the window height, then scroll to its top.
    pub fn fit_to_height(&mut self) {
        self.fit_to_height_internal(true);
    }

    pub(crate) fn fit_to_height_internal(&mut self, scroll_to_top_of_page: bool) {
        self.might_zoom(|viewport, permit| {
            viewport.fitting_type = FittingType::FitToHeight;
            let Some(document) = &viewport.document else {
                return;
            };
            if document.page_dimensions.is_empty() {
                return;
            }
            let page = viewport.most_visible_page();
            let page_rect = document.page_dimensions[page];

            let zoom = viewport.compute_fitting_zoom(
                Size::new(0.0, page_rect.height),
                FitAxes::Height,
            );
            debug!(zoom, page, "fit to height");
            viewport.set_zoom_internal(permit, zoom);
            if scroll_to_top_of_page {
                let y = page_rect.y * viewport.zoom();
                viewport.set_position(Point::new(0.0, y));
            }
            viewport.update_viewport();
        });
    }

    /// Zoom so the most visible page fits entirely, then scroll to its top.
    pub fn fit_to_page(&mut self) {
        self.fit_to_page_internal(true);
    }

    pub(crate) fn fit_to_page_internal(&mut self, scroll_to_top_of_page: bool) {
        self.might_zoom(|viewport, permit| {
            viewport.fitting_type = FittingType::FitToPage;
            let Some(document) = &viewport.document else {
                return;
            };
            if document.page_dimensions.is_empty() {
                return;
            }
            let page = viewport.most_visible_page();
            let page_rect = document.page_dimensions[page];

            // Current page's height, widest page's width.
            let zoom = viewport.compute_fitting_zoom(
                Size::new(document.width, page_rect.height),
                FitAxes::Both,
            );
            debug!(zoom, page, "fit to page");
            viewport.set_zoom_internal(permit, zoom);
            if scroll_to_top_of_page {
                let y = page_rect.y * viewport.zoom();
                viewport.set_position(Point::new(0.0, y));
            }
            viewport.update_viewport();
        });
    }

    /// Return to the default zoom, or fit-to-width if that is smaller.
    pub fn fit_to_none(&mut self) {
        self.might_zoom(|viewport, permit| {
            viewport.fitting_type = FittingType::None;
            if viewport.document.is_none() {
                return;
            }
            let zoom = viewport
                .options
                .default_zoom
                .min(viewport.fit_to_width_zoom());
            viewport.set_zoom_internal(permit, zoom);
            viewport.update_viewport();
        });
    }
}
