//! `[output]` section configuration.
//!
//! Post-processing applied to every compiled bundle.
//!
//! # Example
//!
//! ```toml
//! [output]
//! header = "// Do not edit this file; automatically generated by build.py.\n'use strict';\n"
//!
//! [output.shim]
//! pattern = "new Blockly.Generator"
//! line = "let Blockly = require('robopro-blocks');"
//! ```

use serde::{Deserialize, Serialize};

/// Module-loader line injected when compiled code contains `pattern`.
///
/// An empty pattern disables the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    pub pattern: String,
    pub line: String,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            pattern: "new Blockly.Generator".into(),
            line: "let Blockly = require('robopro-blocks');".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prepended to every generated file.
    pub header: String,
    pub shim: ShimConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header: "// Do not edit this file; automatically generated by build.py.\n\
                     'use strict';\n"
                .into(),
            shim: ShimConfig::default(),
        }
    }
}
