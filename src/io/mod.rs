//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - view-model JSON export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
