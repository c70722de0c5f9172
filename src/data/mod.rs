//! Dataset lifecycle: one-time normalization and the memoized store.
//!
//! - `normalize` applies the fixed recode tables and the hour shift
//! - `store` caches loaded datasets so reruns never touch the filesystem

pub mod normalize;
pub mod store;

pub use normalize::*;
pub use store::*;
