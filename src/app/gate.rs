//! "Already compiled?" gate.
//!
//! An existing output is never overwritten or reused silently: when it exists
//! the caller-supplied `DecisionSource` is asked exactly once.

use std::path::Path;

use crate::domain::Decision;
use crate::error::CompileError;

/// Something that can answer "reprocess or reuse?" for an existing output.
pub trait DecisionSource {
    fn decide(&mut self, output: &Path) -> Result<Decision, CompileError>;
}

/// A fixed policy answers the same way every time.
impl DecisionSource for Decision {
    fn decide(&mut self, _output: &Path) -> Result<Decision, CompileError> {
        Ok(*self)
    }
}

impl Decision {
    /// Parse an S/N answer (case-insensitive, surrounding whitespace ignored).
    pub fn from_answer(answer: &str) -> Result<Self, CompileError> {
        let trimmed = answer.trim();
        if trimmed.eq_ignore_ascii_case("s") {
            Ok(Decision::Reprocess)
        } else if trimmed.eq_ignore_ascii_case("n") {
            Ok(Decision::Reuse)
        } else {
            Err(CompileError::InvalidResponse(trimmed.to_string()))
        }
    }
}

/// `true` when the series must be (re)compiled, `false` to load `output`.
pub fn should_compile(output: &Path, decisions: &mut dyn DecisionSource) -> Result<bool, CompileError> {
    if !output.exists() {
        return Ok(true);
    }
    let decision = decisions.decide(output)?;
    tracing::info!(path = %output.display(), ?decision, "compiled output already exists");
    Ok(decision == Decision::Reprocess)
}
