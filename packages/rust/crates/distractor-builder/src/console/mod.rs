//! Line-oriented terminal front end.
//!
//! Both consoles run over any `BufRead` / `Write` pair so they can be driven
//! by scripted input in tests as well as by stdin/stdout.

mod builder;
mod labeling;
mod render;

use std::fmt::Display;
use std::io::{self, BufRead, Write};

pub use builder::{BuilderCommand, CommandParseError, parse_command, run_builder_console};
pub use labeling::{LabelingSummary, run_labeling_console, select_domain};
pub use render::{render_conversation, render_row};

/// Prompt/answer channel over an input reader and an output writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label`, then read one line without its line ending.
    ///
    /// Returns `None` at end of input.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Print one line.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Consume the console, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}
