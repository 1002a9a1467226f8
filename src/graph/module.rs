//! A single scanned source file and its declared dependencies.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Identifier implicitly provided by the Closure bootstrap file.
pub const BASE_PROVIDE: &str = "goog";

/// Annotation that marks the Closure bootstrap file (`base.js`).
const BASE_MARKER: &str = "@provideGoog";

static PROVIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*goog\.provide\s*\(\s*['"]([^'")]+)['"]\s*\)"#).unwrap()
});

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*goog\.require\s*\(\s*['"]([^'")]+)['"]\s*\)"#).unwrap()
});

/// One source file with the identifiers it defines and depends on.
///
/// Immutable once scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub path: PathBuf,
    pub provides: BTreeSet<String>,
    pub requires: BTreeSet<String>,
    /// The Closure bootstrap file every other module implicitly depends on.
    pub is_base: bool,
}

impl Module {
    /// Extract declarations from file content without executing it.
    ///
    /// Only statement-level `goog.provide(...)` / `goog.require(...)` calls
    /// count; mentions inside comments or strings mid-line are ignored.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
        let mut provides = BTreeSet::new();
        let mut requires = BTreeSet::new();
        let mut is_base = false;

        for line in source.lines() {
            if let Some(caps) = PROVIDE_RE.captures(line) {
                provides.insert(caps[1].to_string());
            } else if let Some(caps) = REQUIRE_RE.captures(line) {
                requires.insert(caps[1].to_string());
            } else if line.contains(BASE_MARKER) {
                is_base = true;
            }
        }

        if is_base {
            provides.insert(BASE_PROVIDE.to_string());
        }

        Self {
            path: path.into(),
            provides,
            requires,
            is_base,
        }
    }

    /// Whether the file path ends with the given suffix (string match).
    pub fn path_ends_with(&self, suffix: &str) -> bool {
        path_ends_with(&self.path, suffix)
    }
}

/// Suffix match on the slash-rendered path.
fn path_ends_with(path: &Path, suffix: &str) -> bool {
    crate::utils::path::to_slash(path).ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provides_and_requires() {
        let source = r#"
'use strict';

goog.provide('Blockly.Arduino.note');

goog.require('Blockly.Arduino');
goog.require("Blockly.Colours");
"#;
        let module = Module::parse("generators/arduino/note.js", source);
        assert_eq!(
            module.provides.iter().collect::<Vec<_>>(),
            vec!["Blockly.Arduino.note"]
        );
        assert_eq!(
            module.requires.iter().collect::<Vec<_>>(),
            vec!["Blockly.Arduino", "Blockly.Colours"]
        );
        assert!(!module.is_base);
    }

    #[test]
    fn test_parse_ignores_mid_line_mentions() {
        let source = "// call goog.require('Not.A.Dep') before use\nvar s = \"goog.provide('x')\";\n";
        let module = Module::parse("core/a.js", source);
        assert!(module.provides.is_empty());
        assert!(module.requires.is_empty());
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let module = Module::parse("a.js", "  goog.provide ( 'A.b' );\n\tgoog.require( 'C' )\n");
        assert!(module.provides.contains("A.b"));
        assert!(module.requires.contains("C"));
    }

    #[test]
    fn test_base_file_provides_goog() {
        let source = "/**\n * @provideGoog\n */\nvar goog = goog || {};\n";
        let module = Module::parse("closure/goog/base.js", source);
        assert!(module.is_base);
        assert!(module.provides.contains(BASE_PROVIDE));
    }

    #[test]
    fn test_path_ends_with() {
        let module = Module::parse("core/block_render_svg_vertical.js", "");
        assert!(module.path_ends_with("block_render_svg_vertical.js"));
        assert!(!module.path_ends_with("block_render_svg_horizontal.js"));
    }
}
