//! Backend selection.
//!
//! The local compiler is preferred, but only after it proves itself on a
//! fixed input. Any failure falls back to the web service for the whole
//! run; there is no per-target fallback.

use super::{Backend, CompileError, LocalCompiler, RemoteCompiler};
use crate::config::{ClosureConfig, ClosureEnv};
use crate::{debug, log};
use std::path::PathBuf;
use thiserror::Error;

/// Directory names older Closure checkouts used.
const LEGACY_LIBRARY_NAMES: &[&str] = &["closure-library-read-only", "google-closure-library"];

/// The backend and Closure layout used for the whole run.
#[derive(Debug)]
pub struct Selection {
    pub backend: Backend,
    pub env: ClosureEnv,
}

impl Selection {
    /// Compiler name exposed to loader templates.
    pub fn compiler_label(&self) -> String {
        match &self.backend {
            Backend::Local(local) => local
                .program()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Backend::Remote(_) => "remote".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("local compiler unavailable ({0}) and remote compilation is disabled")]
    RemoteDisabled(String),

    #[error("Closure library not found at `{}`{}", .path.display(), .hint.as_deref().map(|h| format!("\n{h}")).unwrap_or_default())]
    ClosureNotFound { path: PathBuf, hint: Option<String> },

    #[error(transparent)]
    Client(#[from] CompileError),
}

/// Pick the backend for this run.
///
/// With `force_remote` the local probe is skipped entirely.
pub fn select_backend(config: &ClosureConfig, force_remote: bool) -> Result<Selection, SelectError> {
    let reason = if force_remote {
        "--remote given".to_string()
    } else {
        match probe_local(config) {
            Ok(local) => {
                log!("compiler"; "using local compiler: {}", local.program().display());
                return Ok(Selection {
                    backend: Backend::Local(local),
                    env: config.local.clone(),
                });
            }
            Err(reason) => reason,
        }
    };
    debug!("compiler"; "local compiler not used: {}", reason);

    if !config.allow_remote {
        return Err(SelectError::RemoteDisabled(reason));
    }

    let library = config.remote.library_dir();
    if !library.is_dir() {
        return Err(SelectError::ClosureNotFound {
            hint: rename_hint(&config.remote),
            path: library,
        });
    }

    let remote = RemoteCompiler::new(&config.remote_url)?;
    log!("compiler"; "using remote compiler: {}", remote.url());
    Ok(Selection {
        backend: Backend::Remote(remote),
        env: config.remote.clone(),
    })
}

/// Check every precondition of the local backend, returning why it is
/// unusable.
fn probe_local(config: &ClosureConfig) -> Result<LocalCompiler, String> {
    let library = config.local.library_dir();
    if !library.is_dir() {
        return Err(format!("`{}` not found", library.display()));
    }
    let local = LocalCompiler::find(&config.compiler)
        .ok_or_else(|| format!("`{}` not found on PATH", config.compiler))?;
    if !local.probe(&config.sanity_input, &config.sanity_expect) {
        return Err(format!(
            "`{}` did not reproduce `{}`",
            config.compiler,
            config.sanity_expect.display()
        ));
    }
    Ok(local)
}

fn rename_hint(env: &ClosureEnv) -> Option<String> {
    LEGACY_LIBRARY_NAMES
        .iter()
        .find(|name| **name != env.library && env.root.join(name).is_dir())
        .map(|name| {
            format!(
                "Closure directory needs to be renamed from '{name}' to '{}'.",
                env.library
            )
        })
}
