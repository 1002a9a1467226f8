//! Dependency graph builder.
//!
//! - `scan`: discover source files under root directories and parse their
//!   `goog.provide` / `goog.require` declarations
//! - `DependencyGraph`: provider index over a module set
//! - `DependencyGraph::order`: reachability closure + deterministic topological sort
//!
//! Everything here is a pure function of the filesystem at scan time.

mod error;
mod module;
mod order;
mod scan;

pub use error::GraphError;
pub use module::{BASE_PROVIDE, Module};
pub use order::DependencyGraph;
pub use scan::{list_scripts, scan};
