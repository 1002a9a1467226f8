//! Terminal output: prefixed log lines and the in-place progress line.
//!
//! ```ignore
//! log!("build"; "{} targets", count);
//! debug!("scan"; "skipping `{}`", root.display());   // --verbose only
//!
//! let progress = ProgressLine::new(&[("loaders", 2), ("bundles", 7)]);
//! progress.inc("bundles");
//! progress.finish();
//! ```
//!
//! While a progress line is on screen, `log!` prints above it and redraws
//! nothing; the next `inc` repaints the counters.

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::io::{Write, stdout};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Whether a progress line currently occupies the last terminal line.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print `[module] message`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let mut out = stdout().lock();
    if PROGRESS_ACTIVE.load(Ordering::Relaxed) {
        // Overwrite the progress line; the next repaint puts it back.
        queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }
    writeln!(out, "{} {}", prefix(module), message).ok();
    out.flush().ok();
}

/// `[module]`, colored by what kind of line it introduces.
fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "success" => tag.bright_green().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        "warning" => tag.bright_magenta().bold().to_string(),
        "compiler" => tag.bright_blue().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Progress line
// ============================================================================

/// One-line counters for running targets: `[build] loaders(1/2) bundles(3/7)`.
///
/// Workers call [`inc`](Self::inc) concurrently. A repaint that finds the
/// terminal busy is skipped rather than waited for.
pub struct ProgressLine {
    counters: Vec<Counter>,
    paint: Mutex<()>,
}

struct Counter {
    name: &'static str,
    done: AtomicUsize,
    total: usize,
}

impl ProgressLine {
    /// Counters with a zero total are not shown.
    pub fn new(totals: &[(&'static str, usize)]) -> Self {
        let counters = totals
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                done: AtomicUsize::new(0),
                total,
            })
            .collect();
        let progress = Self {
            counters,
            paint: Mutex::new(()),
        };
        PROGRESS_ACTIVE.store(true, Ordering::Relaxed);
        progress.paint(false);
        progress
    }

    /// Count one finished unit under `name`. Unknown names are ignored.
    pub fn inc(&self, name: &str) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.done.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.paint.try_lock() {
            self.paint(false);
        }
    }

    /// Leave the final counts on screen and move below them.
    pub fn finish(self) {
        {
            let _guard = self.paint.lock();
            self.paint(true);
        }
        PROGRESS_ACTIVE.store(false, Ordering::Relaxed);
        std::mem::forget(self);
    }

    fn line(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.done.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn paint(&self, newline: bool) {
        let mut out = stdout().lock();
        queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        write!(out, "{} {}", prefix("build"), self.line()).ok();
        if newline {
            writeln!(out).ok();
        }
        out.flush().ok();
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::Relaxed);
        let mut out = stdout().lock();
        queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_skips_empty_counters() {
        let progress = ProgressLine::new(&[("loaders", 2), ("langfiles", 0)]);
        assert_eq!(progress.counters.len(), 1);
        progress.inc("loaders");
        progress.inc("unknown");
        assert_eq!(progress.line(), "loaders(1/2)");
        progress.finish();
    }

    #[test]
    fn test_prefix_contains_module_name() {
        assert!(prefix("Warning").contains("[Warning]"));
        assert!(prefix("build").contains("[build]"));
    }
}
