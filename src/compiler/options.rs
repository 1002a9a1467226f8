//! Normalized compiler options shared by both backends.
//!
//! # Example
//!
//! ```toml
//! [core.options]
//! compilation_level = "SIMPLE"
//! language_in = "ECMASCRIPT_2017"
//! language_out = "ECMASCRIPT5"
//! rewrite_polyfills = false
//! defines = ["goog.DEBUG=false"]
//! use_closure_library = true
//! ```

use serde::{Deserialize, Serialize};

/// Closure Compiler optimization level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompilationLevel {
    #[serde(rename = "WHITESPACE_ONLY")]
    WhitespaceOnly,
    #[default]
    #[serde(rename = "SIMPLE", alias = "SIMPLE_OPTIMIZATIONS")]
    Simple,
    #[serde(rename = "ADVANCED", alias = "ADVANCED_OPTIMIZATIONS")]
    Advanced,
}

impl CompilationLevel {
    /// Flag value understood by the compiler executable.
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::WhitespaceOnly => "WHITESPACE_ONLY",
            Self::Simple => "SIMPLE",
            Self::Advanced => "ADVANCED",
        }
    }

    /// Parameter value understood by the compiler web service.
    pub const fn remote_name(self) -> &'static str {
        match self {
            Self::WhitespaceOnly => "WHITESPACE_ONLY",
            Self::Simple => "SIMPLE_OPTIMIZATIONS",
            Self::Advanced => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

/// Options for one compile request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    pub compilation_level: CompilationLevel,
    pub language_in: Option<String>,
    pub language_out: Option<String>,
    pub rewrite_polyfills: Option<bool>,
    pub defines: Vec<String>,
    pub use_closure_library: bool,
}

impl CompileOptions {
    /// Options with only a compilation level set.
    pub fn with_level(level: CompilationLevel) -> Self {
        Self {
            compilation_level: level,
            ..Self::default()
        }
    }

    /// Ordered key/value parameters, before backend-specific filtering.
    ///
    /// The compilation level is rendered with its local name; backends that
    /// need a different spelling substitute it.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![(
            "compilation_level",
            self.compilation_level.local_name().to_string(),
        )];
        if let Some(lang) = &self.language_in {
            params.push(("language_in", lang.clone()));
        }
        if let Some(lang) = &self.language_out {
            params.push(("language_out", lang.clone()));
        }
        if let Some(rewrite) = self.rewrite_polyfills {
            params.push(("rewrite_polyfills", rewrite.to_string()));
        }
        for define in &self.defines {
            params.push(("define", define.clone()));
        }
        if self.use_closure_library {
            params.push(("use_closure_library", "true".to_string()));
        }
        params
    }
}
