//! Replay script sources.
//!
//! A replay script is JSON Lines: one [`ScriptLine`] per line, each a timestamped step
//! that drives a [`crate::session::ViewerSession`]. Scripts come from a file (read once)
//! or from piped stdin (read as lines arrive). Blank lines and lines starting with `#`
//! are skipped.

use crate::gesture::InputEvent;
use crate::model::error::{InputError, ScriptError};
use crate::session::Command;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// One step of a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptLine {
    /// Milliseconds since the start of the replay.
    #[serde(default)]
    pub at_ms: u64,
    /// What happens at that time.
    #[serde(flatten)]
    pub step: ScriptStep,
}

/// What a script line does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Raw touch or wheel input.
    Input(InputEvent),
    /// A message arriving from the renderer.
    Renderer {
        /// The message as the renderer sent it.
        message: serde_json::Value,
    },
    /// A shell command.
    Command(Command),
    /// An animation frame.
    Frame,
}

/// Parse one script line. `line` is 1-based.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns `ScriptError::InvalidStep` if the line is not a valid step.
pub fn parse_script_line(line: usize, text: &str) -> Result<Option<ScriptLine>, ScriptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|err| ScriptError::InvalidStep {
            line,
            message: err.to_string(),
        })
}

/// Where script lines come from.
#[derive(Debug)]
pub enum ScriptSource {
    /// A script file, read once.
    File(FileSource),
    /// Piped stdin.
    Stdin(StdinSource<std::io::Stdin>),
}

impl ScriptSource {
    /// The next raw line with its 1-based line number, or `None` once the script is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for read failures.
    pub fn next_line(&mut self) -> Result<Option<(usize, String)>, InputError> {
        match self {
            ScriptSource::File(f) => Ok(f.next_line()),
            ScriptSource::Stdin(s) => s.next_line(),
        }
    }
}

/// Open the script at `file`, or stdin when no path is given.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file does not exist,
/// `InputError::NoInput` if no file is given and stdin is a terminal, and
/// `InputError::Io` for other I/O errors.
pub fn detect_script_source(file: Option<PathBuf>) -> Result<ScriptSource, InputError> {
    match file {
        Some(path) => Ok(ScriptSource::File(FileSource::new(path)?)),
        None => Ok(ScriptSource::Stdin(StdinSource::new()?)),
    }
}
