//! Per-language message bundles.
//!
//! Two external tools do the work:
//!
//! 1. `js_to_json.py` extracts `msg/json/{en,qqq,synonyms}.json` from
//!    `msg/messages.js`, only when the messages are newer
//! 2. `create_messages.py` turns every language JSON file into
//!    `msg/js/<lang>.js`, always (comparing each pair is not worth it)

use crate::config::{LangfilesConfig, NON_LANGUAGE_FILES};
use crate::debug;
use crate::freshness::{FreshnessError, needs_rebuild};
use crate::target::TargetOutcome;
use crate::utils::exec::Cmd;
use crate::utils::path::to_slash;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Decided before any worker starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangfilesPlan {
    /// Extracted JSON is older than the message definitions.
    pub stale: bool,
}

impl LangfilesPlan {
    /// A missing `messages.js` is fatal for the whole run.
    pub fn new(config: &LangfilesConfig) -> Result<Self, FreshnessError> {
        let stale = needs_rebuild(&[&config.messages], &config.extracted())?;
        Ok(Self { stale })
    }
}

/// Run the tools and report which bundles exist afterwards.
pub fn run(plan: &LangfilesPlan, config: &LangfilesConfig) -> TargetOutcome {
    if plan.stale {
        if let Err(e) = extract(config) {
            return tool_failed(&config.js_to_json, &e);
        }
    } else {
        debug!("langfiles"; "{} is up to date", to_slash(&config.json_dir));
    }

    let languages = language_files(&config.json_dir);
    if let Err(e) = create(config, &languages) {
        return tool_failed(&config.create_messages, &e);
    }

    let (created, missing): (Vec<_>, Vec<_>) = languages
        .iter()
        .map(|json| bundle_path(config, json))
        .partition(|js| js.is_file());
    TargetOutcome::Generated { created, missing }
}

fn tool_failed(tool: &Path, e: &anyhow::Error) -> TargetOutcome {
    TargetOutcome::failed(format!("Error running {}: {e:#}", to_slash(tool)))
}

fn extract(config: &LangfilesConfig) -> Result<()> {
    Cmd::new(&config.python)
        .arg(&config.js_to_json)
        .arg("--input_file")
        .arg(&config.messages)
        .arg("--output_dir")
        .arg(format!("{}/", to_slash(&config.json_dir)))
        .arg("--quiet")
        .quiet()
        .run()?;
    Ok(())
}

fn create(config: &LangfilesConfig, languages: &[PathBuf]) -> Result<()> {
    let json = |name: &str| config.json_dir.join(name);
    Cmd::new(&config.python)
        .arg(&config.create_messages)
        .arg("--source_lang_file")
        .arg(json("en.json"))
        .arg("--source_synonym_file")
        .arg(json("synonyms.json"))
        .arg("--source_constants_file")
        .arg(json("constants.json"))
        .arg("--key_file")
        .arg(json("keys.json"))
        .arg("--output_dir")
        .arg(&config.js_dir)
        .arg("--quiet")
        .args(languages)
        .quiet()
        .run()?;
    Ok(())
}

/// Language JSON files in `json_dir`, sorted.
fn language_files(json_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(json_dir) else {
        return Vec::new();
    };
    let mut files: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            !NON_LANGUAGE_FILES.iter().any(|skip| name.ends_with(skip))
        })
        .collect();
    files.sort();
    files
}

/// `msg/json/<lang>.json` -> `msg/js/<lang>.js`
fn bundle_path(config: &LangfilesConfig, json: &Path) -> PathBuf {
    let stem = json.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    config.js_dir.join(format!("{stem}.js"))
}
