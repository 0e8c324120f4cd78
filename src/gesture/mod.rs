//! Gesture recognition.
//!
//! Turns raw touch, wheel and context-menu input into a normalized pinch gesture
//! stream. The recognizer holds no zoom or viewport state; it only tracks which touch
//! points are live and the running scale of a synthetic ctrl-wheel pinch.

mod recognizer;

pub use recognizer::{GestureRecognizer, DEFAULT_WHEEL_GESTURE_END};

use crate::model::Point;
use serde::{Deserialize, Serialize};

/// Raw input delivered by the host surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    /// A finger touched the surface. `touches` lists every live touch point.
    TouchStart {
        /// Live touch points in screen coordinates.
        touches: Vec<Point>,
    },
    /// One or more fingers moved.
    TouchMove {
        /// Live touch points in screen coordinates.
        touches: Vec<Point>,
    },
    /// A finger left the surface.
    TouchEnd {
        /// Touch points still on the surface.
        touches: Vec<Point>,
    },
    /// The platform cancelled the touch sequence.
    TouchCancel {
        /// Touch points still on the surface.
        touches: Vec<Point>,
    },
    /// Mouse wheel or trackpad scroll.
    #[serde(rename_all = "camelCase")]
    Wheel {
        /// Vertical scroll delta. Positive scrolls down.
        delta_y: f64,
        /// Pointer position in screen coordinates.
        position: Point,
        /// Whether the platform zoom modifier was held.
        #[serde(default)]
        ctrl_key: bool,
    },
}

/// Direction of a pinch update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinchDirection {
    /// Fingers moving apart.
    In,
    /// Fingers moving together.
    Out,
}

impl PinchDirection {
    /// Direction implied by a per-event scale ratio.
    pub fn from_scale_ratio(scale_ratio: Option<f64>) -> Self {
        match scale_ratio {
            Some(ratio) if ratio > 1.0 => PinchDirection::In,
            _ => PinchDirection::Out,
        }
    }
}

/// Direction of a plain wheel tick while in presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelDirection {
    /// Toward the end of the document.
    Down,
    /// Toward the start of the document.
    Up,
}

/// Payload carried by every pinch gesture.
///
/// `None` ratios mean the reference distance was zero; callers must not update the
/// scale from them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinchEventDetail {
    /// Gesture center in screen coordinates.
    pub center: Point,
    /// Ratio relative to the previous event (updates only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_ratio: Option<f64>,
    /// Ratio relative to the start of the gesture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_scale_ratio: Option<f64>,
    /// Zoom direction (updates only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<PinchDirection>,
}

impl PinchEventDetail {
    /// Detail carrying only a center.
    pub fn at(center: Point) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }
}

/// A recognized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum Gesture {
    /// A pinch began.
    PinchStart(PinchEventDetail),
    /// A pinch moved.
    PinchUpdate(PinchEventDetail),
    /// A pinch finished.
    PinchEnd(PinchEventDetail),
    /// A presentation-mode wheel tick.
    Wheel(WheelDirection),
}
