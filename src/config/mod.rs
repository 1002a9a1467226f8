//! Build configuration for `blockbuild.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── closure    # [closure]
//! │   ├── core       # [core]
//! │   ├── blocks     # [blocks]
//! │   ├── generators # [generators]
//! │   ├── output     # [output]
//! │   └── langfiles  # [langfiles]
//! ├── error          # ConfigError, ConfigDiagnostics
//! └── mod.rs         # BuildConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                          |
//! |------------------|--------------------------------------------------|
//! | `[closure]`      | Closure library layouts, compiler, web service   |
//! | `[core]`         | Core sources, entry points, orientation variants |
//! | `[blocks]`       | Block definition groups                          |
//! | `[generators]`   | Code generator languages                         |
//! | `[output]`       | Generated-file header and loader shim            |
//! | `[langfiles]`    | Message bundle tools                             |
//!
//! The file is optional: every field has a default that reproduces the
//! standard Blockly build. Unknown fields are rejected.

mod error;
pub mod section;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{
    BlocksConfig, ClosureConfig, ClosureEnv, CoreConfig, GeneratorsConfig,
    LangfilesConfig, NON_LANGUAGE_FILES, OutputConfig, VariantConfig,
};

use crate::{cli::Cli, debug, log};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing blockbuild.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Config file the settings came from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub closure: ClosureConfig,
    pub core: CoreConfig,
    pub blocks: BlocksConfig,
    pub generators: GeneratorsConfig,
    pub output: OutputConfig,
    pub langfiles: LangfilesConfig,
}

impl BuildConfig {
    /// Load configuration and apply CLI overrides.
    ///
    /// A missing default config file means "use the defaults"; a missing
    /// file passed with `--config` is an error.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let (path, explicit) = cli.config_path();

        let mut config = if path.is_file() {
            let mut config = Self::from_path(&path)?;
            config.config_path = Some(path);
            config
        } else if explicit {
            return Err(ConfigError::NotFound(path));
        } else {
            debug!("config"; "no {} found, using defaults", path.display());
            Self::default()
        };

        if cli.langfiles {
            config.langfiles.enable = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path, rejecting unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields(&ignored, path);
            return Err(ConfigError::UnknownFields(path.to_path_buf(), ignored));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("error"; "unknown fields in {}:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Every output file the configuration can produce, with the field
    /// that names it.
    fn outputs(&self) -> Vec<(String, &Path)> {
        let mut outputs = Vec::new();
        for (i, variant) in self.core.variants.iter().enumerate() {
            outputs.push((format!("core.variants[{i}].loader"), variant.loader.as_path()));
            outputs.push((format!("core.variants[{i}].bundle"), variant.bundle.as_path()));
        }
        for (i, group) in self.blocks.groups.iter().enumerate() {
            outputs.push((format!("blocks.groups[{i}].output"), group.output.as_path()));
        }
        outputs
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.core.entry_points.is_empty() {
            diag.error_with_hint(
                "core.entry_points",
                "at least one entry point is required",
                "entry_points = [\"Blockly\"]",
            );
        }
        if self.core.roots.is_empty() {
            diag.error("core.roots", "at least one source root is required");
        }

        let mut variants = FxHashSet::default();
        for variant in &self.core.variants {
            if !variants.insert(variant.name.as_str()) {
                diag.error(
                    "core.variants",
                    format!("duplicate variant name `{}`", variant.name),
                );
            }
        }

        for language in &self.generators.languages {
            if language.is_empty() || language.contains(['/', '\\']) {
                diag.error(
                    "generators.languages",
                    format!("`{language}` is not a valid language name"),
                );
            }
        }

        let generator_outputs: Vec<_> = self
            .generators
            .languages
            .iter()
            .map(|lang| (format!("generators.languages ({lang})"), GeneratorsConfig::output(lang)))
            .collect();

        let mut seen: FxHashMap<&Path, String> = FxHashMap::default();
        let all = self
            .outputs()
            .into_iter()
            .chain(generator_outputs.iter().map(|(f, p)| (f.clone(), p.as_path())));
        for (field, path) in all {
            if let Some(first) = seen.get(path) {
                diag.error_with_hint(
                    field.clone(),
                    format!("output `{}` is also written by another target", path.display()),
                    format!("already used by `{first}`"),
                );
            } else {
                seen.insert(path, field);
            }
        }

        diag.into_result()
    }
}

/// Parse a test config; panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BuildConfig {
    let (parsed, ignored) = BuildConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
