//! Filesystem path helpers.
//!
//! - `normalize_path` - absolute, lexically cleaned form of a path
//! - `relative_to` - relative path between two normalized locations
//! - `to_slash` - render a path with forward slashes (for emitted JS)
//! - `is_under` - prefix test used to tell library files from project files

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Joins relative paths onto the current directory, then resolves `.` and
/// `..` lexically. Symlinks are not followed, so the result is stable even
/// for files that do not exist yet.
///
/// # Example
/// ```ignore
/// let abs = normalize_path(Path::new("../closure-library/closure/goog"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    clean(&joined)
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Compute `path` relative to the directory `base`.
///
/// Both arguments should be normalized first (see [`normalize_path`]).
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in &base[common..] {
        result.push("..");
    }
    for component in &path[common..] {
        result.push(component.as_os_str());
    }
    result
}

/// Render a path with `/` separators regardless of platform.
///
/// Generated files must be byte-identical across machines, so every path
/// written into an artifact goes through this.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

/// Check whether `path` lives under the directory `dir` (lexically).
#[inline]
pub fn is_under(path: &Path, dir: &Path) -> bool {
    let path = clean(path);
    let dir = clean(dir);
    path != dir && path.starts_with(&dir)
}
