//! Error types for pdfpane.
//!
//! The taxonomy follows how each failure must be handled:
//!
//! - [`ProtocolError`] - the renderer and the viewer have desynchronized (unknown
//!   correlation id, unknown save token, a save payload that fails validation). These are
//!   never silently ignored; the shell is expected to treat them as fatal for the session.
//! - [`SaveError`] - delivered to the caller's pending save handle. The save does not
//!   complete and nothing is written.
//! - [`ViewportError`] - the pinch state machine was driven out of order.
//! - [`InputError`] / [`ScriptError`] - replay script input failures for the binary.
//! - [`AppError`] - top-level error for the binary, composing everything via `From`.
//!
//! Degenerate geometry (zero-distance pinches, zero-size documents) is not an error: those
//! paths return sentinels such as `None` scale ratios or a zero fitting zoom.

use crate::model::PinchPhase;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error for the replay binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the replay script.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// A replay script line could not be parsed.
    #[error("Failed to parse script: {0}")]
    Script(#[from] ScriptError),

    /// The renderer side of the protocol misbehaved.
    #[error("Renderer protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// The pinch state machine was driven out of order.
    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing outgoing messages failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// A renderer message that violates the request/reply or save-token protocol.
///
/// Accepting any of these would let a confused or compromised renderer inject data the
/// viewer never asked for, so they surface as errors instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A reply referenced a correlation id with no outstanding request.
    ///
    /// Either the id was never issued or its reply already arrived.
    #[error("Reply for unknown request '{message_id}'")]
    UnknownRequest {
        /// The correlation id carried by the reply.
        message_id: String,
    },

    /// A reply arrived for an outstanding request of a different kind.
    ///
    /// The request stays pending.
    #[error("Reply '{received}' does not answer request '{message_id}' ({expected})")]
    MismatchedReply {
        /// The correlation id carried by the reply.
        message_id: String,
        /// Reply type the request expects.
        expected: &'static str,
        /// Reply type that arrived.
        received: &'static str,
    },

    /// A message with a known type did not have the expected shape.
    #[error("Malformed '{message_type}' message: {reason}")]
    MalformedMessage {
        /// The `type` field of the message.
        message_type: String,
        /// Deserializer diagnostics.
        reason: String,
    },

    /// A save message referenced a token this channel never minted, or one that was
    /// already consumed.
    #[error("Save message for unknown token '{token}'")]
    UnknownSaveToken {
        /// The token carried by the message.
        token: String,
    },

    /// A save payload failed validation.
    ///
    /// The pending save has already been rejected with the same reason when this is
    /// returned.
    #[error("Rejected save payload for token '{token}': {reason}")]
    InvalidSavePayload {
        /// The token the payload was delivered for.
        token: String,
        /// What was wrong with the bytes.
        reason: PayloadError,
    },
}

/// Why a save payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Shorter than the smallest viable document header.
    #[error("payload of {len} bytes is smaller than the {min}-byte minimum")]
    TooSmall {
        /// Payload length.
        len: usize,
        /// Minimum accepted length.
        min: usize,
    },

    /// Larger than the hard cap.
    #[error("payload of {len} bytes exceeds the {max}-byte cap")]
    TooLarge {
        /// Payload length.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The first four bytes are not `%PDF`.
    #[error("payload does not start with %PDF (found {found:?})")]
    BadMagic {
        /// The first four bytes that were found instead.
        found: [u8; 4],
    },
}

/// Failure delivered to a pending save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The renderer answered without any data.
    #[error("Renderer returned no data to save")]
    NoData,

    /// The renderer answered with data that failed validation.
    #[error("Renderer returned an invalid document: {0}")]
    InvalidPayload(PayloadError),

    /// The channel was dropped before the renderer answered.
    #[error("Save was abandoned before the renderer answered")]
    Dropped,
}

/// Pinch entry points were called out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// `pinch_zoom` or `pinch_zoom_end` was called with no active pinch.
    #[error("Pinch update received while pinch phase is {phase:?}")]
    PinchNotActive {
        /// The phase the viewport was in.
        phase: PinchPhase,
    },

    /// `pinch_zoom_start` was called while a pinch is already in progress.
    #[error("Pinch start received while pinch phase is {phase:?}")]
    PinchAlreadyActive {
        /// The phase the viewport was in.
        phase: PinchPhase,
    },
}

/// Errors encountered when reading the replay script.
#[derive(Debug, Error)]
pub enum InputError {
    /// The script file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use pdfpane::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No script path was given and stdin is an interactive terminal.
    #[error("No input source: provide a script path or pipe a script to stdin")]
    NoInput,

    /// Any other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A replay script line that could not be parsed.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The line is not a valid script step.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfpane::model::error::ScriptError;
    ///
    /// let err = ScriptError::InvalidStep {
    ///     line: 42,
    ///     message: "unknown variant `jump`".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid script step at line {line}: {message}")]
    InvalidStep {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },
}
