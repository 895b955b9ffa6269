//! Error types.
//!
//! - `CompileError`: what the library returns (typed, carries paths)
//! - `AppError`: what the binary reports (message + process exit code)

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the compilation pipeline.
#[derive(Error, Debug)]
pub enum CompileError {
    /// An index entry does not match the expected timestamp layout.
    #[error("{}:{line}: timestamp '{value}' does not match format '{expected}'", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        value: String,
        expected: &'static str,
    },

    /// The decision source answered something other than reprocess/reuse.
    #[error("invalid response '{0}': expected S (reprocess) or N (reuse)")]
    InvalidResponse(String),

    /// Reuse was selected but the compiled output is gone.
    #[error("compiled output '{}' is missing; cannot reuse it", .0.display())]
    MissingOutput(PathBuf),

    #[error("{name} loss rate {value} is outside [0, 1)")]
    InvalidLossRate { name: &'static str, value: f64 },

    #[error("{}: missing column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}:{line}: value '{value}' is not a number", .path.display())]
    Value {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{}: CSV error: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Process exit code used by the binary for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CompileError::Io { .. } | CompileError::Csv { .. } => 4,
            _ => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
