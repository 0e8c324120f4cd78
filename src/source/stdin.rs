//! Stdin-based script source for piped input.
//!
//! Lines are read as they arrive, so a host can stream steps into a running replay
//! (`producer | pdfpane`) as well as pipe a complete script (`cat script.jsonl | pdfpane`).

use crate::model::error::InputError;
use std::io::{BufRead, BufReader, IsTerminal, Read};

/// Stdin source for piped JSON Lines.
pub struct StdinSource<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    complete: bool,
}

impl<R: Read> std::fmt::Debug for StdinSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource")
            .field("line_number", &self.line_number)
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

impl StdinSource<std::io::Stdin> {
    /// Create a source reading from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is an interactive terminal, so the replay
    /// does not sit waiting for keyboard input the user never meant to type.
    pub fn new() -> Result<Self, InputError> {
        if Self::is_tty() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(std::io::stdin()))
    }

    fn is_tty() -> bool {
        std::io::stdin().is_terminal()
    }
}

impl<R: Read> StdinSource<R> {
    /// Create a source over any reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            complete: false,
        }
    }

    /// Block until the next line arrives. Returns `None` at EOF and sets the complete
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn next_line(&mut self) -> Result<Option<(usize, String)>, InputError> {
        if self.complete {
            return Ok(None);
        }

        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            self.complete = true;
            return Ok(None);
        }

        self.line_number += 1;
        let line = buffer.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some((self.line_number, line)))
    }

    /// Whether EOF has been reached.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
