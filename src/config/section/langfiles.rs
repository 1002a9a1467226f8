//! `[langfiles]` section configuration.
//!
//! Message bundles are generated by the project's Python i18n tools.
//!
//! # Example
//!
//! ```toml
//! [langfiles]
//! enable = true
//! python = "python3"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON files in `json_dir` that are inputs to the tools, not languages.
pub const NON_LANGUAGE_FILES: &[&str] = &["keys.json", "synonyms.json", "qqq.json", "constants.json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LangfilesConfig {
    /// Build the message bundles (also enabled by `--langfiles`).
    pub enable: bool,

    /// Python interpreter used to run the tools.
    pub python: String,

    /// Message definitions the JSON files are extracted from.
    pub messages: PathBuf,

    pub json_dir: PathBuf,
    pub js_dir: PathBuf,

    pub js_to_json: PathBuf,
    pub create_messages: PathBuf,
}

impl LangfilesConfig {
    /// JSON files regenerated from `messages`.
    pub fn extracted(&self) -> Vec<PathBuf> {
        ["en.json", "qqq.json", "synonyms.json"]
            .iter()
            .map(|name| self.json_dir.join(name))
            .collect()
    }
}

impl Default for LangfilesConfig {
    fn default() -> Self {
        Self {
            enable: false,
            python: "python".into(),
            messages: PathBuf::from("msg/messages.js"),
            json_dir: PathBuf::from("msg/json"),
            js_dir: PathBuf::from("msg/js"),
            js_to_json: PathBuf::from("i18n/js_to_json.py"),
            create_messages: PathBuf::from("i18n/create_messages.py"),
        }
    }
}
