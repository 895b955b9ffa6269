//! Interactive "reprocess?" prompt.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags (`--on-existing`)
//! - the prompt is the fallback when no policy was given and an output exists
//!
//! A single line is read. `S` reprocesses, `N` reuses; anything else fails.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app::gate::DecisionSource;
use crate::domain::Decision;
use crate::error::CompileError;

/// Asks on `output` and reads the answer from `input`.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout, answer from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DecisionSource for ConsolePrompt<R, W> {
    fn decide(&mut self, output_path: &Path) -> Result<Decision, CompileError> {
        write!(
            self.output,
            "'{}' already exists. Reprocess and save a new version? (S/N) ",
            output_path.display()
        )
        .and_then(|()| self.output.flush())
        .map_err(|e| CompileError::io(output_path, e))?;

        let mut answer = String::new();
        let bytes = self
            .input
            .read_line(&mut answer)
            .map_err(|e| CompileError::io(output_path, e))?;

        if bytes == 0 {
            return Err(CompileError::InvalidResponse("<end of input>".to_string()));
        }
        Decision::from_answer(&answer)
    }
}
