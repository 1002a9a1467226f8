//! Compiler invocation adapter.
//!
//! A uniform interface over the two interchangeable Closure Compiler
//! backends:
//!
//! - `local`: spawns the compiler executable, stdout is the compiled code
//! - `remote`: form POST to the compiler web service, JSON response
//!
//! Callers only see [`CompileRequest`] and [`CompileResult`]; the backend is
//! chosen once per run by [`select_backend`].

mod local;
mod options;
mod remote;
mod result;
mod select;

pub use local::LocalCompiler;
pub use options::{CompilationLevel, CompileOptions};
pub use remote::{DEFAULT_URL, RemoteCompiler};
pub use result::{CompileResult, Diagnostic, Statistics};
pub use select::{Selection, select_backend};

use crate::utils::path::to_slash;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One input file of a compile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Display name used in diagnostics.
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    /// Part of the Closure library; the web service supplies its own copy.
    pub library: bool,
}

impl SourceFile {
    /// Read a source file from disk.
    pub fn read(path: &Path, library: bool) -> Result<Self, CompileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CompileError::Io(path.to_path_buf(), e))?;
        Ok(Self {
            name: to_slash(path),
            path: path.to_path_buf(),
            content,
            library,
        })
    }
}

/// A normalized compile request.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// Target name, used for intermediate files and logging.
    pub target: String,
    pub sources: Vec<SourceFile>,
    pub options: CompileOptions,
}

impl CompileRequest {
    /// Sum of input sizes in bytes.
    pub fn original_size(&self) -> u64 {
        self.sources.iter().map(|s| s.content.len() as u64).sum()
    }
}

/// Transport-level failure: the compiler could not be reached or answered
/// with something unreadable.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to run compiler: {0}")]
    Process(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("compiler service returned status {0}")]
    Status(u16),

    #[error("invalid compiler response: {0}")]
    Json(#[from] serde_json::Error),
}

/// A compiler backend.
pub trait Compiler: Send + Sync {
    /// Short name for logs ("local" / "remote").
    fn name(&self) -> &'static str;

    fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError>;
}

/// The backend chosen for the whole run.
pub enum Backend {
    Local(LocalCompiler),
    Remote(RemoteCompiler),
}

impl Backend {
    pub fn compiler(&self) -> &dyn Compiler {
        match self {
            Self::Local(local) => local,
            Self::Remote(remote) => remote,
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(local) => write!(f, "Local({})", local.program().display()),
            Self::Remote(remote) => write!(f, "Remote({})", remote.url()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_file_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.js");
        std::fs::write(&path, "var a = 1;\n").unwrap();

        let source = SourceFile::read(&path, false).unwrap();
        assert_eq!(source.content, "var a = 1;\n");
        assert!(source.name.ends_with("/a.js"));
    }

    #[test]
    fn test_source_file_missing() {
        let err = SourceFile::read(Path::new("/nonexistent/a.js"), false).unwrap_err();
        assert!(matches!(err, CompileError::Io(..)));
    }

    #[test]
    fn test_original_size() {
        let source = |content: &str| SourceFile {
            name: "x".into(),
            path: PathBuf::from("x"),
            content: content.into(),
            library: false,
        };
        let request = CompileRequest {
            target: "t".into(),
            sources: vec![source("abc"), source("de")],
            options: CompileOptions::default(),
        };
        assert_eq!(request.original_size(), 5);
    }
}
