//! `[core]` section configuration.
//!
//! The Closure-style sources that make up the editor core, and the
//! orientation variants built from them.
//!
//! # Example
//!
//! ```toml
//! [core]
//! roots = ["core"]
//! entry_points = ["Blockly"]
//! entry_file = "core/blockly.js"
//!
//! [[core.variants]]
//! name = "vertical"
//! exclude = "block_render_svg_horizontal.js"
//! loader = "blockly_uncompressed_vertical.js"
//! bundle = "blockly_compressed_vertical.js"
//!
//! [core.options]
//! compilation_level = "SIMPLE"
//! language_in = "ECMASCRIPT_2017"
//! ```

use crate::compiler::{CompilationLevel, CompileOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One orientation of the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantConfig {
    pub name: String,
    /// Files whose path ends with this suffix are left out of the variant.
    pub exclude: String,
    /// Uncompressed loader output.
    pub loader: PathBuf,
    /// Compressed bundle output.
    pub bundle: PathBuf,
}

impl VariantConfig {
    fn new(name: &str, exclude: &str) -> Self {
        Self {
            name: name.into(),
            exclude: exclude.into(),
            loader: PathBuf::from(format!("blockly_uncompressed_{name}.js")),
            bundle: PathBuf::from(format!("blockly_compressed_{name}.js")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Project source directories scanned for `goog.provide`.
    pub roots: Vec<PathBuf>,

    /// Identifiers the compressed bundle is built from.
    pub entry_points: Vec<String>,

    /// Entry file; its parent's parent is the project directory name the
    /// loader rewrites into a runtime variable.
    pub entry_file: PathBuf,

    pub variants: Vec<VariantConfig>,

    pub options: CompileOptions,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("core")],
            entry_points: vec!["Blockly".into()],
            entry_file: PathBuf::from("core/blockly.js"),
            variants: vec![
                VariantConfig::new("vertical", "block_render_svg_horizontal.js"),
                VariantConfig::new("horizontal", "block_render_svg_vertical.js"),
            ],
            options: CompileOptions {
                compilation_level: CompilationLevel::Simple,
                language_in: Some("ECMASCRIPT_2017".into()),
                language_out: Some("ECMASCRIPT5".into()),
                rewrite_polyfills: Some(false),
                defines: vec!["goog.DEBUG=false".into()],
                use_closure_library: true,
            },
        }
    }
}
