//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`CompileRequest`, `LossProfile`, `RawFormat`, `FileOrder`)
//! - the cache decision (`Decision`)
//! - the time-indexed energy series (`EnergySeries`) and compile outcomes

pub mod types;

pub use types::*;
