//! Uncompressed loader generation.
//!
//! The loader registers every scanned module with the Closure debug loader
//! (`goog.addDependency`) and then `goog.require`s everything the project
//! provides, so the browser loads the raw sources one by one.

use super::template::{TemplateVars, render};
use crate::config::ClosureEnv;
use crate::debug;
use crate::graph::DependencyGraph;
use crate::utils::path::normalize_path;
use regex::Regex;
use std::path::{Path, PathBuf};

const PROLOGUE: &str = r#"
var isNodeJS = !!(typeof module !== 'undefined' && module.exports &&
                  typeof window === 'undefined');

if (isNodeJS) {
  var window = {};
  require('{closure_library}');
}

window.BLOCKLY_DIR = (function() {
  if (!isNodeJS) {
    // Find name of current directory.
    var scripts = document.getElementsByTagName('script');
    var re = new RegExp('(.+)[\/]blockly_uncompressed(_vertical|_horizontal|)\.js$');
    for (var i = 0, script; script = scripts[i]; i++) {
      var match = re.exec(script.src);
      if (match) {
        return match[1];
      }
    }
    alert('Could not detect Blockly\'s directory name.');
  }
  return '';
})();

window.BLOCKLY_BOOT = function() {
  var dir = '';
  if (isNodeJS) {
    require('{closure_library}');
    dir = 'blockly';
  } else {
    // Execute after Closure has loaded.
    if (!window.goog) {
      alert('Error: Closure not found.  Read this:\n' +
            'developers.google.com/blockly/guides/modify/web/closure');
    }
    if (window.BLOCKLY_DIR.search(/node_modules/)) {
      dir = '..';
    } else {
      dir = window.BLOCKLY_DIR.match(/[^\/]+$/)[0];
    }
  }
"#;

const EPILOGUE: &str = r#"
delete this.BLOCKLY_DIR;
delete this.BLOCKLY_BOOT;
};

if (isNodeJS) {
  window.BLOCKLY_BOOT();
  module.exports = Blockly;
} else {
  // Delete any existing Closure (e.g. Soy's nogoog_shim).
  document.write('<script>var goog = undefined;</script>');
  // Load fresh Closure Library.
  document.write('<script src="' + window.BLOCKLY_DIR +
      '/{closure_dir}/{closure_library}/closure/goog/base.js"></script>');
  document.write('<script>window.BLOCKLY_BOOT();</script>');
}
"#;

/// Path separator class matching both `/` and `\`.
const SEP: &str = r"[\\/]";

/// Inputs for one loader file.
pub struct Loader<'a> {
    pub graph: &'a DependencyGraph,
    pub env: &'a ClosureEnv,
    pub vars: &'a TemplateVars,
    pub header: &'a str,
    pub entry_file: &'a Path,
}

impl Loader<'_> {
    /// Render the complete loader script.
    pub fn render(&self) -> String {
        let deps = rewrite_project_dir(&self.dependency_lines(), self.entry_file);

        let mut out = String::from(self.header);
        out.push_str(&render(PROLOGUE, self.vars));
        out.push_str(&deps);
        out.push('\n');
        out.push_str("\n// Load Blockly.\n");
        for provide in self.project_provides() {
            out.push_str(&format!("goog.require('{provide}');\n"));
        }
        out.push_str(&render(EPILOGUE, self.vars));
        out
    }

    /// Sorted `goog.addDependency` lines for every scanned module.
    fn dependency_lines(&self) -> String {
        let base_dir = self.base_dir();
        let mut lines: Vec<String> = self
            .graph
            .modules()
            .iter()
            .map(|m| DependencyGraph::deps_line(m, &normalize_path(&m.path), &base_dir))
            .collect();
        lines.sort();
        lines.join("\n")
    }

    /// Directory of `base.js`, which the Closure loader resolves against.
    fn base_dir(&self) -> PathBuf {
        self.graph
            .base()
            .and_then(|base| normalize_path(&base.path).parent().map(Path::to_path_buf))
            .unwrap_or_else(|| normalize_path(Path::new(".")))
    }

    /// Identifiers provided outside the Closure library, sorted.
    fn project_provides(&self) -> Vec<&str> {
        let mut provides: Vec<&str> = self
            .graph
            .modules()
            .iter()
            .filter(|m| !self.env.is_library(&m.path))
            .flat_map(|m| m.provides.iter().map(String::as_str))
            .collect();
        provides.sort_unstable();
        provides.dedup();
        provides
    }
}

/// Replace the project's directory name with the runtime `dir` variable.
///
/// The name is the directory holding `entry_file`'s parents, as seen in the
/// dependency paths. Rewriting it lets a loader generated in one checkout
/// work from another.
fn rewrite_project_dir(deps: &str, entry_file: &Path) -> String {
    let parts: Vec<String> = entry_file
        .components()
        .map(|c| regex::escape(&c.as_os_str().to_string_lossy()))
        .collect();
    let Some((_, parents)) = parts.split_last() else {
        return deps.to_string();
    };

    let find = format!(r"{SEP}([^\\/]+){SEP}{}", parts.join(SEP));
    let Some(name) = Regex::new(&find)
        .ok()
        .and_then(|re| re.captures(deps))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
    else {
        debug!("loader"; "`{}` not found in dependency paths", entry_file.display());
        return deps.to_string();
    };

    let suffix: String = parents.iter().map(|p| format!("{SEP}{p}")).collect();
    let replace = format!(r"({SEP}){}({suffix}{SEP})", regex::escape(&name));
    match Regex::new(&replace) {
        Ok(re) => re.replace_all(deps, r#"${1}" + dir + "${2}"#).into_owned(),
        Err(_) => deps.to_string(),
    }
}
