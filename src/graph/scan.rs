//! Source discovery: walk root directories and parse every script.

use super::{GraphError, Module};
use crate::debug;
use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

const SCRIPT_EXT: &str = "js";

/// Scan root directories for modules.
///
/// Roots that do not exist are skipped. The result is sorted by path so
/// that every later stage sees the same sequence on every run.
pub fn scan(roots: &[PathBuf]) -> Result<Vec<Module>, GraphError> {
    let mut files: Vec<PathBuf> = roots
        .iter()
        .filter(|root| {
            let exists = root.exists();
            if !exists {
                debug!("scan"; "skipping missing root `{}`", root.display());
            }
            exists
        })
        .flat_map(|root| collect_scripts(root))
        .collect();

    files.sort();
    files.dedup();

    files.into_iter().map(|path| read_module(&path)).collect()
}

/// Read and parse a single file.
fn read_module(path: &Path) -> Result<Module, GraphError> {
    let source = fs::read_to_string(path).map_err(|e| GraphError::Io(path.to_path_buf(), e))?;
    Ok(Module::parse(path, &source))
}

/// Collect `.js` files below `dir` (a plain file root is returned as-is).
fn collect_scripts(dir: &Path) -> Vec<PathBuf> {
    if dir.is_file() {
        return vec![dir.to_path_buf()];
    }
    WalkDir::new(dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == SCRIPT_EXT))
        .collect()
}

/// List `*.js` files directly inside `dir`, sorted.
///
/// Directory listing order is platform dependent, so callers that build
/// file lists from globs go through here.
pub fn list_scripts(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == SCRIPT_EXT))
        .collect();
    files.sort();
    files
}
