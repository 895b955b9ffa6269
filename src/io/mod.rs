//! Input/output helpers.
//!
//! - raw file discovery (`select`)
//! - raw file ingest + normalization (`ingest`)
//! - compiled series write (`export`) and read-back (`cache`)

pub mod cache;
pub mod export;
pub mod ingest;
pub mod select;

pub use cache::*;
pub use export::*;
pub use ingest::*;
pub use select::*;
