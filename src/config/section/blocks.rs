//! `[blocks]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [blocks]
//! prelude = "build/gen_blocks.js"
//! extra = ["core/colours.js", "core/constants.js"]
//! remove = "var Blockly={Blocks:{}};"
//!
//! [[blocks.groups]]
//! name = "common"
//! dir = "blocks_common"
//! output = "blocks_compressed.js"
//! ```

use crate::compiler::{CompilationLevel, CompileOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A directory of block definitions compiled into one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockGroup {
    pub name: String,
    pub dir: PathBuf,
    pub output: PathBuf,
}

impl BlockGroup {
    fn new(name: &str, output: &str) -> Self {
        Self {
            name: name.into(),
            dir: PathBuf::from(format!("blocks_{name}")),
            output: PathBuf::from(output),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksConfig {
    pub groups: Vec<BlockGroup>,

    /// Declares `Blockly.Blocks` so the compiler accepts the block files.
    pub prelude: PathBuf,

    /// Appended after the group's files (shared colour and constant tables).
    pub extra: Vec<PathBuf>,

    /// Prelude output stripped from the compiled bundle.
    pub remove: String,

    pub options: CompileOptions,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                BlockGroup::new("horizontal", "blocks_compressed_horizontal.js"),
                BlockGroup::new("vertical", "blocks_compressed_vertical.js"),
                BlockGroup::new("common", "blocks_compressed.js"),
            ],
            prelude: PathBuf::from("build/gen_blocks.js"),
            extra: vec![
                PathBuf::from("core/colours.js"),
                PathBuf::from("core/constants.js"),
            ],
            remove: "var Blockly={Blocks:{}};".into(),
            options: CompileOptions::with_level(CompilationLevel::Simple),
        }
    }
}
