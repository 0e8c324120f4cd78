//! File-based script source.
//!
//! The whole file is read on construction; lines are then handed out one at a time.

use crate::model::error::InputError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A replay script read from disk.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    lines: VecDeque<String>,
    line_number: usize,
}

impl FileSource {
    /// Read the script at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let lines: VecDeque<String> = content.lines().map(str::to_string).collect();
        debug!(path = %path.display(), lines = lines.len(), "script loaded");

        Ok(Self {
            path: path.to_path_buf(),
            lines,
            line_number: 0,
        })
    }

    /// Path the script was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The next line with its 1-based number.
    pub fn next_line(&mut self) -> Option<(usize, String)> {
        let line = self.lines.pop_front()?;
        self.line_number += 1;
        Some((self.line_number, line))
    }

    /// Lines not yet handed out.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}
