//! Wire format of the renderer protocol.
//!
//! Every message is a JSON object discriminated by its `type` field. Field names are
//! camelCase on the wire.

use crate::model::{DocumentDimensions, LayoutOptions, PinchPhase, SaveRequestType};
use crate::viewport::ZoomSnapshot;
use serde::{Deserialize, Serialize};

/// Geometry the renderer needs to lay out and paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportMessage {
    /// Whether the change stems from user input.
    pub user_initiated: bool,
    /// Effective zoom.
    pub zoom: f64,
    /// Layout options of the current document.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub layout_options: Option<LayoutOptions>,
    /// Horizontal scroll position.
    pub x_offset: f64,
    /// Vertical scroll position.
    pub y_offset: f64,
    /// Pinch phase code.
    pub pinch_phase: PinchPhase,
    /// Pinch center x, 0 outside a pinch.
    pub pinch_x: f64,
    /// Pinch center y, 0 outside a pinch.
    pub pinch_y: f64,
    /// Pinch pan x, 0 outside a pinch.
    pub pinch_vector_x: f64,
    /// Pinch pan y, 0 outside a pinch.
    pub pinch_vector_y: f64,
}

impl From<&ZoomSnapshot> for ViewportMessage {
    fn from(snapshot: &ZoomSnapshot) -> Self {
        let center = snapshot.pinch_center.unwrap_or_default();
        let vector = snapshot.pinch_pan_vector.unwrap_or_default();
        Self {
            user_initiated: snapshot.user_initiated,
            zoom: snapshot.zoom,
            layout_options: snapshot.layout_options,
            x_offset: snapshot.position.x,
            y_offset: snapshot.position.y,
            pinch_phase: snapshot.pinch_phase,
            pinch_x: center.x,
            pinch_y: center.y,
            pinch_vector_x: vector.x,
            pinch_vector_y: vector.y,
        }
    }
}

/// Messages sent to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// The scroll position changed.
    UpdateScroll {
        /// Horizontal scroll position.
        x: f64,
        /// Vertical scroll position.
        y: f64,
    },
    /// Full viewport geometry.
    Viewport(ViewportMessage),
    /// Stop any in-progress scroll animation.
    StopScrolling,
    /// Rotate every page a quarter turn clockwise.
    RotateClockwise,
    /// Rotate every page a quarter turn counterclockwise.
    RotateCounterclockwise,
    /// Switch between single-column and two-up layout.
    #[serde(rename_all = "camelCase")]
    SetTwoUpView {
        /// Lay pages out side by side.
        enable_two_up_view: bool,
    },
    /// Show or hide annotations.
    DisplayAnnotations {
        /// Whether annotations are shown.
        display: bool,
    },
    /// Select all text.
    SelectAll,
    /// Open the print dialog.
    Print,
    /// Produce the document bytes for a save.
    #[serde(rename_all = "camelCase")]
    Save {
        /// Single-use token the answer must carry.
        token: String,
        /// Which variant of the document to produce.
        save_request_type: SaveRequestType,
    },
    /// Render a thumbnail of a page.
    #[serde(rename_all = "camelCase")]
    GetThumbnail {
        /// Zero-based page index.
        page: usize,
        /// Correlation id.
        message_id: String,
    },
    /// Resolve a named destination.
    #[serde(rename_all = "camelCase")]
    GetNamedDestination {
        /// Destination name.
        named_destination: String,
        /// Correlation id.
        message_id: String,
    },
    /// Fetch the current text selection.
    #[serde(rename_all = "camelCase")]
    GetSelectedText {
        /// Correlation id.
        message_id: String,
    },
}

impl OutboundMessage {
    /// Wire `type` of the message.
    pub fn message_type(&self) -> &'static str {
        match self {
            OutboundMessage::UpdateScroll { .. } => "updateScroll",
            OutboundMessage::Viewport(_) => "viewport",
            OutboundMessage::StopScrolling => "stopScrolling",
            OutboundMessage::RotateClockwise => "rotateClockwise",
            OutboundMessage::RotateCounterclockwise => "rotateCounterclockwise",
            OutboundMessage::SetTwoUpView { .. } => "setTwoUpView",
            OutboundMessage::DisplayAnnotations { .. } => "displayAnnotations",
            OutboundMessage::SelectAll => "selectAll",
            OutboundMessage::Print => "print",
            OutboundMessage::Save { .. } => "save",
            OutboundMessage::GetThumbnail { .. } => "getThumbnail",
            OutboundMessage::GetNamedDestination { .. } => "getNamedDestination",
            OutboundMessage::GetSelectedText { .. } => "getSelectedText",
        }
    }
}

/// A rendered page thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailReply {
    /// Correlation id of the request.
    pub message_id: String,
    /// Thumbnail width in pixels.
    pub width: u32,
    /// Thumbnail height in pixels.
    pub height: u32,
    /// RGBA pixels.
    #[serde(default)]
    pub image_data: Vec<u8>,
}

/// Where a named destination points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedDestinationReply {
    /// Correlation id of the request.
    pub message_id: String,
    /// Zero-based page, or -1 when the name is unknown.
    pub page_number: i64,
    /// View parameters, such as `XYZ` or `FitH`, when the destination has them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_destination_view: Option<String>,
}

impl NamedDestinationReply {
    /// The destination page, if the name resolved.
    pub fn page(&self) -> Option<usize> {
        usize::try_from(self.page_number).ok()
    }
}

/// The current text selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTextReply {
    /// Correlation id of the request.
    pub message_id: String,
    /// Selected text, empty when nothing is selected.
    #[serde(default)]
    pub selected_text: String,
}

/// Messages received from the renderer.
///
/// Types this enum does not know deserialize to [`InboundMessage::Unknown`] and are
/// forwarded to the shell untouched, unless they carry a `messageId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub(crate) enum InboundMessage {
    GoToPage {
        page: i64,
    },
    SetScrollPosition {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    ScrollBy {
        x: f64,
        y: f64,
    },
    #[serde(rename_all = "camelCase")]
    SaveData {
        token: String,
        #[serde(default)]
        file_name: String,
        #[serde(default)]
        data_to_save: Option<Vec<u8>>,
    },
    ConsumeSaveToken {
        token: String,
    },
    DocumentDimensions(DocumentDimensions),
    NavigateToDestination {
        page: i64,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        zoom: Option<f64>,
    },
    GetThumbnailReply(ThumbnailReply),
    GetNamedDestinationReply(NamedDestinationReply),
    GetSelectedTextReply(SelectedTextReply),
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Whether this is a typed reply to a correlated request.
    pub(crate) fn is_reply(&self) -> bool {
        matches!(
            self,
            InboundMessage::GetThumbnailReply(_)
                | InboundMessage::GetNamedDestinationReply(_)
                | InboundMessage::GetSelectedTextReply(_)
        )
    }
}
