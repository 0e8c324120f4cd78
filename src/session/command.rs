//! Shell commands a host surface issues on behalf of the user.

use crate::model::{FittingType, SaveRequestType, Size};
use crate::viewport::KeyEvent;
use serde::{Deserialize, Serialize};

/// A user or host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Step to the next preset zoom.
    ZoomIn,
    /// Step to the previous preset zoom.
    ZoomOut,
    /// Set an explicit zoom.
    SetZoom {
        /// Requested zoom, clamped to the preset range.
        zoom: f64,
    },
    /// Switch fitting policy.
    #[serde(rename_all = "camelCase")]
    SetFittingType {
        /// The policy to apply.
        fitting_type: FittingType,
    },
    /// Scroll to a zero-based page.
    GoToPage {
        /// Target page, clamped to the document.
        page: i64,
    },
    /// Next page (next row in two-up view).
    NextPage,
    /// Previous page (previous row in two-up view).
    PreviousPage,
    /// Rotate a quarter turn clockwise.
    RotateClockwise,
    /// Rotate a quarter turn counterclockwise.
    RotateCounterclockwise,
    /// Switch two-up layout.
    SetTwoUpView {
        /// Lay pages out side by side.
        enabled: bool,
    },
    /// Enter or leave presentation mode.
    SetPresentationMode {
        /// Whether presentation mode is on.
        enabled: bool,
    },
    /// Show or hide annotations.
    DisplayAnnotations {
        /// Whether annotations are shown.
        display: bool,
    },
    /// Select all text.
    SelectAll,
    /// Print the document.
    Print,
    /// Save the document.
    #[serde(rename_all = "camelCase")]
    Save {
        /// Which variant to save.
        request_type: SaveRequestType,
    },
    /// Request a page thumbnail.
    GetThumbnail {
        /// Zero-based page.
        page: usize,
    },
    /// Resolve a named destination and go there.
    GoToNamedDestination {
        /// Destination name.
        name: String,
    },
    /// Fetch the selected text.
    GetSelectedText,
    /// A directional key press.
    Key(KeyEvent),
    /// The window was resized.
    Resize(Size),
    /// The host zoom changed.
    BrowserZoomChanged {
        /// New host zoom.
        zoom: f64,
    },
    /// The host applied a zoom the session requested.
    BrowserZoomApplied {
        /// Applied host zoom.
        zoom: f64,
    },
}
