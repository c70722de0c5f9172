//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the category code tables (`Season`, `Weather`, `WorkingDay`, `Year`)
//! - pass-through coded cells (`Coded<T>`)
//! - normalized records (`DailyRecord`, `HourlyRecord`)
//! - the user filter selection (`Selection`) and run configuration (`ViewConfig`)

pub mod types;

pub use types::*;
