//! Freshness detection for generated files (mtime based).

mod mtime;

pub use mtime::{FreshnessError, needs_rebuild};
