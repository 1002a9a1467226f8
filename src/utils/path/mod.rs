//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.

pub mod fs;

pub use fs::{is_under, normalize_path, relative_to, to_slash};
