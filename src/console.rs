//! Operator confirmation prompts.
//!
//! Prompting goes through injected reader/writer handles so that the
//! overwrite and large-recording decisions stay testable without a
//! terminal. Quiet mode passes an empty reader, which makes every
//! question resolve to its non-destructive "no" default.

use std::io::{BufRead, Write};

use crate::error::PipelineError;

/// Asks the operator yes/no questions through injected I/O handles.
pub struct Prompter<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter over the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Asks a yes/no question and returns `true` only on a yes answer.
    ///
    /// An empty answer (end of input) counts as no.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the console fails.
    pub fn confirm(&mut self, question: &str) -> Result<bool, PipelineError> {
        write!(self.writer, "{question} (y/n): ")
            .map_err(|e| PipelineError::Io(format!("prompt write failed: {e}")))?;
        self.writer.flush().map_err(|e| PipelineError::Io(format!("prompt flush failed: {e}")))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| PipelineError::Io(format!("prompt read failed: {e}")))?;
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
