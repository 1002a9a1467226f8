//! `[closure]` section configuration.
//!
//! Where the Closure library lives and how to reach the compiler.
//!
//! # Example
//!
//! ```toml
//! [closure]
//! compiler = "google-closure-compiler"
//! remote_url = "https://closure-compiler.appspot.com/compile"
//! allow_remote = true
//!
//! [closure.local]                  # npm install layout
//! dir = "node_modules"
//! root = "node_modules"
//! library = "google-closure-library"
//!
//! [closure.remote]                 # sibling checkout layout
//! dir = ".."
//! root = ".."
//! library = "closure-library"
//! ```
//!
//! A partial layout table keeps the other fields of its own layout.

use crate::compiler::DEFAULT_URL;
use crate::utils::path::is_under;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Compiler executable installed by `npm install google-closure-compiler`.
#[cfg(windows)]
const DEFAULT_COMPILER: &str = "google-closure-compiler.cmd";
#[cfg(not(windows))]
const DEFAULT_COMPILER: &str = "google-closure-compiler";

/// One Closure library layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureEnv {
    /// Library parent, relative to the loader script at runtime.
    pub dir: String,
    /// Library parent, relative to the working directory.
    pub root: PathBuf,
    /// Library directory name.
    pub library: String,
}

impl ClosureEnv {
    /// The npm layout used with the local compiler.
    pub fn npm() -> Self {
        Self {
            dir: "node_modules".into(),
            root: PathBuf::from("node_modules"),
            library: "google-closure-library".into(),
        }
    }

    /// The sibling checkout layout used with the compiler service.
    pub fn sibling() -> Self {
        Self {
            dir: "..".into(),
            root: PathBuf::from(".."),
            library: "closure-library".into(),
        }
    }

    /// `<root>/<library>`
    pub fn library_dir(&self) -> PathBuf {
        self.root.join(&self.library)
    }

    /// Whether `path` lies inside the Closure root.
    ///
    /// Library files are neither uploaded to the compiler service nor
    /// required by the loader.
    pub fn is_library(&self, path: &Path) -> bool {
        is_under(path, &self.root)
    }
}

/// Fields given in a `[closure.local]` or `[closure.remote]` table.
#[derive(Deserialize)]
struct EnvOverride {
    dir: Option<String>,
    root: Option<PathBuf>,
    library: Option<String>,
}

impl EnvOverride {
    fn apply(self, base: ClosureEnv) -> ClosureEnv {
        ClosureEnv {
            dir: self.dir.unwrap_or(base.dir),
            root: self.root.unwrap_or(base.root),
            library: self.library.unwrap_or(base.library),
        }
    }
}

fn local_env<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ClosureEnv, D::Error> {
    Ok(EnvOverride::deserialize(deserializer)?.apply(ClosureEnv::npm()))
}

fn remote_env<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ClosureEnv, D::Error> {
    Ok(EnvOverride::deserialize(deserializer)?.apply(ClosureEnv::sibling()))
}

/// Closure library and compiler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    #[serde(deserialize_with = "local_env")]
    pub local: ClosureEnv,
    #[serde(deserialize_with = "remote_env")]
    pub remote: ClosureEnv,

    /// Local compiler executable, looked up on `PATH`.
    pub compiler: String,

    /// Compiler web service endpoint.
    pub remote_url: String,

    /// Fall back to the web service when the local compiler is unusable.
    pub allow_remote: bool,

    /// Fixed input for the local compiler sanity check.
    pub sanity_input: PathBuf,

    /// Expected stdout for `sanity_input`.
    pub sanity_expect: PathBuf,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            local: ClosureEnv::npm(),
            remote: ClosureEnv::sibling(),
            compiler: DEFAULT_COMPILER.into(),
            remote_url: DEFAULT_URL.into(),
            allow_remote: true,
            sanity_input: PathBuf::from("build/test_input.js"),
            sanity_expect: PathBuf::from("build/test_expect.js"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_closure_defaults() {
        let config = test_parse_config("");
        let closure = &config.closure;
        assert_eq!(closure.local.library_dir(), Path::new("node_modules/google-closure-library"));
        assert_eq!(closure.remote.library_dir(), Path::new("../closure-library"));
        assert_eq!(closure.remote_url, DEFAULT_URL);
        assert!(closure.allow_remote);
        assert!(closure.compiler.starts_with("google-closure-compiler"));
    }

    #[test]
    fn test_closure_override() {
        let config = test_parse_config(
            "[closure]\nallow_remote = false\n[closure.local]\nroot = \"vendor\"\n",
        );
        assert!(!config.closure.allow_remote);
        assert_eq!(config.closure.local.root, PathBuf::from("vendor"));
        assert_eq!(config.closure.local.library, "google-closure-library");
    }

    #[test]
    fn test_partial_remote_keeps_sibling_layout() {
        let config = test_parse_config("[closure.remote]\nroot = \"../vendor\"\n");
        let remote = &config.closure.remote;
        assert_eq!(remote.root, PathBuf::from("../vendor"));
        assert_eq!(remote.dir, "..");
        assert_eq!(remote.library, "closure-library");
        assert_eq!(config.closure.local, ClosureEnv::npm());
    }

    #[test]
    fn test_partial_local_keeps_npm_layout() {
        let config = test_parse_config("[closure.local]\nlibrary = \"closure-lib\"\n");
        let local = &config.closure.local;
        assert_eq!(local.dir, "node_modules");
        assert_eq!(local.root, PathBuf::from("node_modules"));
        assert_eq!(local.library, "closure-lib");
        assert_eq!(config.closure.remote, ClosureEnv::sibling());
    }

    #[test]
    fn test_unknown_layout_field_reported() {
        let (_, ignored) =
            crate::config::BuildConfig::parse_with_ignored("[closure.remote]\nlibary = \"x\"\n")
                .unwrap();
        assert!(ignored.iter().any(|f| f.ends_with("libary")));
    }

    #[test]
    fn test_is_library() {
        let env = ClosureEnv::sibling();
        assert!(env.is_library(Path::new("../closure-library/closure/goog/base.js")));
        assert!(!env.is_library(Path::new("core/blockly.js")));
    }
}
