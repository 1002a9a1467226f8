//! Shared utilities: external commands, paths, pluralization.

pub mod exec;
pub mod path;
mod plural;

pub use plural::plural_count;
