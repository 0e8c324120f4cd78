//! Plain geometry value types.
//!
//! None of these types carry a coordinate-frame tag. Call sites track whether a
//! given value lives in screen, content or document space.

use serde::{Deserialize, Serialize};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(self, other: Point) -> Point {
        Point::new(other.x - self.x, other.y - self.y)
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A point where either coordinate may be absent.
///
/// Used by renderer scroll requests that only move one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialPoint {
    /// Horizontal coordinate, if specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical coordinate, if specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Area of the intersection with `other`, or 0 when they do not overlap.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left >= right || top >= bottom {
            return 0.0;
        }

        (right - left) * (bottom - top)
    }
}

/// Layout options reported by the renderer alongside document dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Text direction code as understood by the renderer.
    #[serde(default)]
    pub direction: u8,
    /// Number of clockwise 90-degree rotations applied to every page.
    #[serde(default)]
    pub default_page_orientation: u8,
    /// Whether pages are laid out side by side.
    #[serde(default)]
    pub two_up_view_enabled: bool,
}

/// Laid-out document geometry in content units.
///
/// # Invariants
/// - `page_dimensions` is in reading order.
/// - Page bottoms are non-decreasing, which page lookups rely on for binary search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDimensions {
    /// Width of the widest row of pages.
    pub width: f64,
    /// Total document height.
    pub height: f64,
    /// Renderer layout options, if any were reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<LayoutOptions>,
    /// Bounds of every page, already laid out.
    #[serde(default)]
    pub page_dimensions: Vec<Rect>,
}

impl DocumentDimensions {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_dimensions.len()
    }

    /// Stack pages of the given sizes vertically, centering each one in the widest row.
    ///
    /// Mirrors the single-column layout the renderer reports; handy for shells and tests
    /// that have no renderer attached.
    pub fn single_column(page_sizes: &[Size]) -> Self {
        let width = page_sizes.iter().map(|s| s.width).fold(0.0, f64::max);
        let mut y = 0.0;
        let page_dimensions = page_sizes
            .iter()
            .map(|size| {
                let rect = Rect::new((width - size.width) / 2.0, y, size.width, size.height);
                y += size.height;
                rect
            })
            .collect();

        Self {
            width,
            height: y,
            layout_options: None,
            page_dimensions,
        }
    }
}
