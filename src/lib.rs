//! pdfpane
//!
//! Interactive surface core for a PDF viewer whose document is rendered out of process.
//! The viewer side owns scroll and zoom state, recognizes pinch gestures, and talks to
//! the renderer over an asynchronous message protocol.
//!
//! The pure core ([`gesture`], [`zoom`], [`viewport`], [`channel`]) has no I/O. The
//! [`session`] shell wires it together, and [`replay`] drives a session from a script
//! for the `pdfpane` binary.

pub mod channel;
pub mod config;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod replay;
pub mod session;
pub mod source;
pub mod viewport;
pub mod zoom;
