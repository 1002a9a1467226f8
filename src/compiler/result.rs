//! Normalized compile result and diagnostics.
//!
//! The remote service's JSON response deserializes straight into
//! [`CompileResult`]; the local backend builds the same shape by hand.

use serde::Deserialize;

/// Prefix the compiler uses for anonymous inputs (`Input_0`, `Input_1`, ...).
const INPUT_PREFIX: &str = "Input_";

/// Size statistics reported for a compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub original_size: u64,
    pub compressed_size: u64,
}

/// A warning or error with its source location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Diagnostic {
    #[serde(alias = "error", alias = "warning")]
    pub message: String,
    /// Internal input id, e.g. `Input_3`.
    pub file: Option<String>,
    pub lineno: i64,
    pub charno: i64,
    /// Text of the offending source line.
    pub line: Option<String>,
}

impl Diagnostic {
    /// A diagnostic with no location.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Failure reported by the service itself rather than the compiled code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerError {
    pub code: i64,
    pub error: String,
}

/// Result of one compile request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileResult {
    pub compiled_code: Option<String>,
    pub statistics: Statistics,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
    pub server_errors: Vec<ServerError>,
    /// Names of the submitted sources, in submission order.
    #[serde(skip)]
    pub inputs: Vec<String>,
}

impl CompileResult {
    /// Any error or server error makes the result fatal for its target.
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty() || !self.server_errors.is_empty()
    }

    /// Map an internal input id back to the submitted source name.
    ///
    /// `Input_N` is 0-based; anything else renders as `???`.
    pub fn resolve_input(&self, file: &str) -> &str {
        file.strip_prefix(INPUT_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| self.inputs.get(n))
            .map_or("???", String::as_str)
    }

    /// Render a diagnostic with file, line, source text and a caret.
    ///
    /// ```text
    /// ERROR - variable foo is undeclared
    /// core/block.js at line 12:
    ///   foo.bar();
    ///   ^
    /// ```
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = diagnostic.message.trim_end().to_string();
        if let Some(file) = diagnostic.file.as_deref().filter(|f| !f.is_empty()) {
            out.push_str(&format!(
                "\n{} at line {}:",
                self.resolve_input(file),
                diagnostic.lineno
            ));
            if let Some(line) = &diagnostic.line {
                out.push('\n');
                out.push_str(line);
            }
            let column = usize::try_from(diagnostic.charno).unwrap_or(0);
            out.push('\n');
            out.push_str(&" ".repeat(column));
            out.push('^');
        }
        out
    }

    pub fn rendered_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| self.render(w)).collect()
    }

    pub fn rendered_errors(&self) -> Vec<String> {
        self.server_errors
            .iter()
            .map(|e| format!("server error {}: {}", e.code, e.error))
            .chain(self.errors.iter().map(|e| self.render(e)))
            .collect()
    }
}
