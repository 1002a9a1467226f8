//! Mtime-based staleness checks for generated files.
//!
//! Sources are required; outputs are optional. A missing output is always
//! stale, a missing source means the rebuild cannot happen at all.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FreshnessError {
    #[error("Source file missing: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Error checking modification time of `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),
}

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

fn source_mtime(path: &Path) -> Result<SystemTime, FreshnessError> {
    match path.metadata().and_then(|m| m.modified()) {
        Ok(time) => Ok(time),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(FreshnessError::SourceMissing(path.to_path_buf()))
        }
        Err(e) => Err(FreshnessError::Io(path.to_path_buf(), e)),
    }
}

/// Whether any source is newer than the oldest output.
///
/// `max(source mtime) > min(output mtime)`; an empty or partly missing
/// output set always needs a rebuild.
pub fn needs_rebuild<S, O>(sources: &[S], outputs: &[O]) -> Result<bool, FreshnessError>
where
    S: AsRef<Path>,
    O: AsRef<Path>,
{
    let mut newest_source = None;
    for source in sources {
        let time = source_mtime(source.as_ref())?;
        newest_source = newest_source.max(Some(time));
    }

    let mut oldest_output: Option<SystemTime> = None;
    for output in outputs {
        let Some(time) = get_mtime(output.as_ref()) else {
            return Ok(true);
        };
        oldest_output = Some(oldest_output.map_or(time, |t| t.min(time)));
    }

    Ok(match (newest_source, oldest_output) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(source), Some(output)) => source > output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, secs: u64) {
        fs::write(path, "x").unwrap();
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_source_newer_than_output() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("messages.js");
        let out = dir.path().join("en.json");
        touch(&out, 10);
        touch(&src, 20);
        assert!(needs_rebuild(&[&src], &[&out]).unwrap());
    }

    #[test]
    fn test_output_newer_than_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("messages.js");
        let out = dir.path().join("en.json");
        touch(&src, 10);
        touch(&out, 20);
        assert!(!needs_rebuild(&[&src], &[&out]).unwrap());
    }

    #[test]
    fn test_compares_against_oldest_output() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("messages.js");
        let old = dir.path().join("qqq.json");
        let new = dir.path().join("en.json");
        touch(&old, 10);
        touch(&src, 20);
        touch(&new, 30);
        assert!(needs_rebuild(&[&src], &[&new, &old]).unwrap());
    }

    #[test]
    fn test_equal_times_are_fresh() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("messages.js");
        let out = dir.path().join("en.json");
        touch(&src, 10);
        touch(&out, 10);
        assert!(!needs_rebuild(&[&src], &[&out]).unwrap());
    }

    #[test]
    fn test_missing_output_needs_rebuild() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("messages.js");
        touch(&src, 10);
        let missing = dir.path().join("synonyms.json");
        assert!(needs_rebuild(&[&src], &[&missing]).unwrap());
        assert!(needs_rebuild::<_, PathBuf>(&[&src], &[]).unwrap());
    }

    #[test]
    fn test_missing_source_is_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("messages.js");
        let out = dir.path().join("en.json");
        touch(&out, 10);
        let err = needs_rebuild(&[&src], &[&out]).unwrap_err();
        assert!(matches!(err, FreshnessError::SourceMissing(p) if p == src));
    }

    #[test]
    fn test_get_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.js");
        assert!(get_mtime(&path).is_none());
        touch(&path, 5);
        assert_eq!(
            get_mtime(&path),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_005))
        );
    }
}
