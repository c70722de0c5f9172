//! Aggregation engine.
//!
//! Responsibilities:
//!
//! - grouping primitives over record slices (`group`)
//! - the named aggregate queries feeding the dashboard widgets (`queries`)
//!
//! Every query is a pure function of (normalized dataset, current selection)
//! and is recomputed on every render pass; only the load boundary is cached.

pub mod group;
pub mod queries;

pub use group::*;
pub use queries::*;
