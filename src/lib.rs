//! `energy-compiler` library crate.
//!
//! The binary (`energy-compiler`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - other front-ends can inject their own reprocess/reuse decision
//!
//! Typical library use:
//!
//! ```no_run
//! use energy_compiler::app::pipeline::compile;
//! use energy_compiler::domain::{CompileRequest, Decision};
//!
//! let mut request = CompileRequest::new("data/raw", ".");
//! request.persist = true;
//! let outcome = compile(&request, &mut Decision::Reprocess)?;
//! println!("{} rows", outcome.series.len());
//! # Ok::<(), energy_compiler::error::CompileError>(())
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
