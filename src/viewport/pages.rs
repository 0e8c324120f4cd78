//! Page lookups, page geometry in screen space, and page navigation.

use super::Viewport;
use crate::model::{Point, Rect};

/// Width of the drop shadow drawn around every page, in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageShadow {
    /// Above the page.
    pub top: f64,
    /// Below the page.
    pub bottom: f64,
    /// Left of the page.
    pub left: f64,
    /// Right of the page.
    pub right: f64,
}

/// Shadow the renderer paints around each page.
pub const PAGE_SHADOW: PageShadow = PageShadow {
    top: 3.0,
    bottom: 7.0,
    left: 5.0,
    right: 5.0,
};

const POINTS_TO_PIXELS: f64 = 96.0 / 72.0;

impl Viewport {
    fn pages(&self) -> &[Rect] {
        self.document
            .as_ref()
            .map(|document| document.page_dimensions.as_slice())
            .unwrap_or(&[])
    }

    /// Index of the page under document y-coordinate `y`.
    ///
    /// A gap between two pages belongs to the later one. Past the end of the document
    /// the last page is returned. Requires at least one page.
    pub(crate) fn page_at_y(&self, y: f64) -> usize {
        let pages = self.pages();
        let last = pages.len().saturating_sub(1);
        // Fractions can push y past the last page bottom without a scrollbar.
        let y = y.floor();

        let mut min = 0usize;
        let mut max = last;
        while min <= max {
            let page = min + (max - min) / 2;
            let top = if page > 0 { pages[page - 1].bottom() } else { 0.0 };
            let bottom = pages[page].bottom();

            if top <= y && y <= bottom {
                return page;
            }
            if page == last {
                return page;
            }
            if top > y {
                if page == 0 {
                    break;
                }
                max = page - 1;
            } else {
                min = page + 1;
            }
        }
        min.min(last)
    }

    /// Highest page index that can be visible in `viewport_rect`.
    fn last_page_in_viewport(&self, viewport_rect: &Rect) -> usize {
        let page_at_y = self.page_at_y(viewport_rect.bottom());
        let pages = self.pages();

        if !self.two_up_view_enabled() || page_at_y % 2 == 1 || page_at_y + 1 >= pages.len() {
            return page_at_y;
        }

        // The left page of a two-up row; its twin may also be visible.
        if viewport_rect.intersection_area(&pages[page_at_y + 1]) > 0.0 {
            page_at_y + 1
        } else {
            page_at_y
        }
    }

    /// Page with the largest fraction of its area inside the viewport.
    ///
    /// Ties go to the earlier page. Returns 0 when there are no pages.
    pub fn most_visible_page(&self) -> usize {
        let pages = self.pages();
        if pages.is_empty() {
            return 0;
        }

        let viewport_rect = self.viewport_rect();
        let first = self.page_at_y(viewport_rect.y);
        let last = self.last_page_in_viewport(&viewport_rect);
        if first >= last {
            return first;
        }

        let mut most_visible = first;
        let mut largest_fraction = 0.0;
        for (index, page) in pages.iter().enumerate().take(last + 1).skip(first) {
            let area = page.area();
            if area <= 0.0 {
                continue;
            }
            let fraction = page.intersection_area(&viewport_rect) / area;
            if fraction > largest_fraction {
                most_visible = index;
                largest_fraction = fraction;
            }
        }
        most_visible
    }

    /// Whether a screen point lies over page content rather than the side margin.
    pub fn is_point_inside_page(&self, point: Point) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        if document.page_dimensions.is_empty() {
            return false;
        }

        let zoom = self.zoom();
        let position = self.position();
        let page = self.page_at_y((position.y + point.y) / zoom);
        let page_width = document.page_dimensions[page].width * zoom;
        let document_width = document.width * zoom;

        let outer_width = self.window.width.max(document_width);
        if page_width >= outer_width {
            return true;
        }

        let x = point.x + position.x;
        let min_x = (outer_width - page_width) / 2.0;
        let max_x = outer_width - min_x;
        x >= min_x && x <= max_x
    }

    /// Page bounds minus the page shadow, in document units.
    pub fn page_inset_dimensions(&self, page: usize) -> Rect {
        let Some(rect) = self.pages().get(page) else {
            return Rect::default();
        };
        Rect::new(
            rect.x + PAGE_SHADOW.left,
            rect.y + PAGE_SHADOW.top,
            rect.width - PAGE_SHADOW.left - PAGE_SHADOW.right,
            rect.height - PAGE_SHADOW.top - PAGE_SHADOW.bottom,
        )
    }

    /// Page content (without shadow) in screen coordinates.
    ///
    /// Out-of-range pages resolve to the last page; all zero without a document.
    pub fn page_screen_rect(&self, page: usize) -> Rect {
        let Some(document) = &self.document else {
            return Rect::default();
        };
        let Some(last) = document.page_dimensions.len().checked_sub(1) else {
            return Rect::default();
        };
        let page = page.min(last);
        let page_rect = document.page_dimensions[page];
        let inset = self.page_inset_dimensions(page);

        // Pages are centered within the document width.
        let x = (document.width - page_rect.width) / 2.0 + PAGE_SHADOW.left;
        let zoom = self.zoom();
        let space_on_left = ((self.window.width - document.width * zoom) / 2.0).max(0.0);
        let position = self.position();

        Rect::new(
            x * zoom + space_on_left - position.x,
            inset.y * zoom - position.y,
            inset.width * zoom,
            inset.height * zoom,
        )
    }

    /// Convert a point on `page` (PDF points, bottom-left origin) to the page's
    /// pixel frame, honoring rotation and the page shadow.
    pub fn convert_page_to_screen(&self, page: usize, point: Point) -> Point {
        let inset = self.page_inset_dimensions(page);
        // Already rotated.
        let width = inset.width;
        let height = inset.height;

        let px = point.x * POINTS_TO_PIXELS;
        let py = point.y * POINTS_TO_PIXELS;

        // Flip to a top-left origin, then rotate about the rotated page box.
        let (fx, fy) = (px, height - py);
        let (x, y) = match self.rotations % 4 {
            1 => (width - fy, fx),
            2 => (width - fx, height - fy),
            3 => (fy, height - fx),
            _ => (fx, fy),
        };

        Point::new(x + PAGE_SHADOW.left, y + PAGE_SHADOW.top)
    }

    // ===== Navigation =====

    /// Go to the next page, or the left page of the next row in two-up view.
    pub fn go_to_next_page(&mut self) {
        let current = self.most_visible_page();
        let offset = if self.two_up_view_enabled() && current % 2 == 0 {
            2
        } else {
            1
        };
        self.go_to_page(current as i64 + offset);
    }

    /// Go to the previous page, or the left page of the previous row in two-up view.
    pub fn go_to_previous_page(&mut self) {
        let current = self.most_visible_page();
        let offset = match (self.two_up_view_enabled(), current % 2 == 0) {
            (false, _) => -1,
            (true, true) => -2,
            (true, false) => -3,
        };
        self.go_to_page(current as i64 + offset);
    }

    /// Scroll to the top of `page` (zero-based, clamped to the document).
    pub fn go_to_page(&mut self, page: i64) {
        self.go_to_page_and_xy(page, Some(0.0), Some(0.0));
    }

    /// Scroll to an offset within `page` (zero-based, clamped to the document).
    ///
    /// An absent or NaN coordinate keeps the current in-page coordinate of the most
    /// visible page. Outside paged modes the explicit `y` target is shifted up by the
    /// toolbar height so it is not hidden behind the toolbar.
    pub fn go_to_page_and_xy(&mut self, page: i64, x: Option<f64>, y: Option<f64>) {
        self.might_zoom(|viewport, _permit| {
            let pages = viewport.pages();
            let Some(last) = pages.len().checked_sub(1) else {
                return;
            };
            let page = page.clamp(0, last as i64) as usize;
            let target = pages[page];

            let current = viewport.current_page_coordinates();
            let zoom = viewport.zoom();
            let toolbar_offset = if viewport.fitting_type.is_paged() {
                0.0
            } else {
                viewport.options.toolbar_height
            };

            let x = match x.filter(|x| !x.is_nan()) {
                Some(x) => x,
                None => current.x,
            };
            let y = match y.filter(|y| !y.is_nan()) {
                Some(y) => (target.y + y) * zoom - toolbar_offset,
                None => (target.y + current.y) * zoom,
            };

            viewport.set_position(Point::new((target.x + x) * zoom, y));
            viewport.update_viewport();
        });
    }

    /// Navigate to a destination, optionally zooming first. A zoom of 0 is ignored.
    pub fn handle_navigate_to_destination(
        &mut self,
        page: i64,
        x: Option<f64>,
        y: Option<f64>,
        zoom: Option<f64>,
    ) {
        if let Some(zoom) = zoom.filter(|z| *z != 0.0 && !z.is_nan()) {
            self.set_zoom(zoom);
        }
        self.go_to_page_and_xy(page, x, y);
    }

    /// Scroll position relative to the most visible page, in document units.
    fn current_page_coordinates(&self) -> Point {
        let Some(page) = self.pages().get(self.most_visible_page()) else {
            return Point::ZERO;
        };
        let zoom = self.zoom();
        let position = self.position();
        Point::new(position.x / zoom - page.x, position.y / zoom - page.y)
    }
}
