//! Discrete viewport modes shared by the viewport and the renderer protocol.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Policy governing automatic zoom selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FittingType {
    /// Zoom is whatever the user last chose.
    #[default]
    None,
    /// The current page fits entirely in the viewport.
    FitToPage,
    /// The widest page fills the viewport width.
    FitToWidth,
    /// The current page fills the viewport height.
    FitToHeight,
}

impl FittingType {
    /// Whether this is a paged mode.
    ///
    /// In paged modes, page up/down jump between page tops and content is already
    /// positioned below the toolbar.
    pub fn is_paged(self) -> bool {
        matches!(self, FittingType::FitToPage | FittingType::FitToHeight)
    }
}

/// Phase of an in-progress two-finger zoom gesture.
///
/// Serialized as the integer code the renderer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinchPhase {
    /// No pinch in progress.
    #[default]
    None,
    /// The pinch has just begun.
    Start,
    /// The fingers are moving apart.
    UpdateZoomIn,
    /// The fingers are moving together.
    UpdateZoomOut,
    /// The pinch is finishing.
    End,
}

impl PinchPhase {
    /// Wire code of the phase.
    pub fn code(self) -> u8 {
        match self {
            PinchPhase::None => 0,
            PinchPhase::Start => 1,
            PinchPhase::UpdateZoomOut => 2,
            PinchPhase::UpdateZoomIn => 3,
            PinchPhase::End => 4,
        }
    }

    /// Phase for a wire code. Unknown codes read as [`PinchPhase::None`].
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => PinchPhase::Start,
            2 => PinchPhase::UpdateZoomOut,
            3 => PinchPhase::UpdateZoomIn,
            4 => PinchPhase::End,
            _ => PinchPhase::None,
        }
    }

    /// Whether a pinch gesture is active.
    pub fn is_active(self) -> bool {
        self != PinchPhase::None
    }
}

impl Serialize for PinchPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PinchPhase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(PinchPhase::from_code)
    }
}

/// Which variant of the document a save should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveRequestType {
    /// The document as originally loaded.
    Original,
    /// The document including form edits.
    Edited,
    /// The document including annotations.
    Annotations,
}
