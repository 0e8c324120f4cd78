//! Domain model types (pure).
//!
//! Geometry values, discrete viewport modes and the error taxonomy shared by every
//! subsystem.

pub mod error;
pub mod geometry;
pub mod modes;

// Re-export for convenience
pub use error::{
    AppError, InputError, PayloadError, ProtocolError, SaveError, ScriptError, ViewportError,
};
pub use geometry::{DocumentDimensions, LayoutOptions, PartialPoint, Point, Rect, Size};
pub use modes::{FittingType, PinchPhase, SaveRequestType};
