//! Output writer for compiled bundles.
//!
//! Turns compiler output into the final artifact:
//!
//! 1. header, plus the loader shim line when the code asks for it
//! 2. `remove` marker stripped (the prelude the compiler needed)
//! 3. Google's Apache license blocks stripped (the compiler keeps every copy)
//!
//! and writes it only when the compiler reported real sizes.

use crate::compiler::Statistics;
use crate::config::OutputConfig;
use regex::Regex;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

/// The canonical Blockly license comment, with any title line and year.
static LICENSE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = [
        r"/\*",
        r"",
        r" [\w ]+",
        r"",
        r" Copyright \d+ Google Inc\.",
        r" https://developers\.google\.com/blockly/",
        r"",
        r#" Licensed under the Apache License, Version 2\.0 \(the "License"\);"#,
        r" you may not use this file except in compliance with the License\.",
        r" You may obtain a copy of the License at",
        r"",
        r"   http://www\.apache\.org/licenses/LICENSE-2\.0",
        r"",
        r" Unless required by applicable law or agreed to in writing, software",
        r#" distributed under the License is distributed on an "AS IS" BASIS,"#,
        r" WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied\.",
        r" See the License for the specific language governing permissions and",
        r" limitations under the License\.",
        r"\*/",
    ]
    .join("\n");
    Regex::new(&pattern).unwrap()
});

/// Post-process compiled code into the file contents.
pub fn finalize(config: &OutputConfig, compiled: &str, remove: &str) -> String {
    let shim = &config.shim;
    let mut code = if !shim.pattern.is_empty() && compiled.contains(&shim.pattern) {
        format!("{}\n{}\n\n{}", config.header, shim.line, compiled)
    } else {
        format!("{}\n{}", config.header, compiled)
    };

    if !remove.is_empty() {
        code = code.replace(remove, "");
    }

    LICENSE.replace_all(&code, "").into_owned()
}

/// Compression summary in whole kilobytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub original_kb: u64,
    pub compressed_kb: u64,
    /// Compressed size as a percentage of the original.
    pub ratio: u64,
}

impl SizeReport {
    /// `None` unless both sizes are positive.
    pub fn from_stats(stats: Statistics) -> Option<Self> {
        if stats.original_size == 0 || stats.compressed_size == 0 {
            return None;
        }
        let kb = |bytes: u64| (bytes as f64 / 1024.0 + 0.5) as u64;
        let ratio = stats.compressed_size as f64 / stats.original_size as f64 * 100.0 + 0.5;
        Some(Self {
            original_kb: kb(stats.original_size),
            compressed_kb: kb(stats.compressed_size),
            ratio: ratio as u64,
        })
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Size changed from {} KB to {} KB ({}%).",
            self.original_kb, self.compressed_kb, self.ratio
        )
    }
}

/// Result of [`write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(SizeReport),
    /// The compiler reported an empty input or output; nothing was written.
    Skipped,
}

/// Write `code` to `path` if the reported sizes are both positive.
pub fn write(path: &Path, code: &str, stats: Statistics) -> io::Result<WriteOutcome> {
    let Some(report) = SizeReport::from_stats(stats) else {
        return Ok(WriteOutcome::Skipped);
    };
    write_file(path, code)?;
    Ok(WriteOutcome::Written(report))
}

/// Write a generated file, creating its parent directory.
pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
