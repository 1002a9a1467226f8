//! Compressed bundle targets: read sources, compile, post-process, write.

use super::{TargetContext, TargetOutcome};
use crate::compiler::{CompileOptions, CompileRequest, SourceFile};
use crate::output::{self, WriteOutcome};
use std::path::{Path, PathBuf};

/// One input of a bundle, in compile order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInput {
    pub path: PathBuf,
    /// Part of the Closure library.
    pub library: bool,
}

impl BundleInput {
    pub fn project(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            library: false,
        }
    }
}

/// A compressed bundle, fully planned.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub inputs: Vec<BundleInput>,
    pub options: CompileOptions,
    /// Marker stripped from the compiled code (empty for none).
    pub remove: String,
}

/// Outcome plus rendered compiler warnings.
pub type BundleResult = (TargetOutcome, Vec<String>);

impl Bundle {
    pub fn run(&self, name: &str, output: &Path, ctx: &TargetContext<'_>) -> BundleResult {
        let sources: Result<Vec<_>, _> = self
            .inputs
            .iter()
            .map(|input| SourceFile::read(&input.path, input.library))
            .collect();
        let sources = match sources {
            Ok(sources) => sources,
            Err(e) => return (TargetOutcome::failed(e.to_string()), Vec::new()),
        };

        let request = CompileRequest {
            target: name.to_string(),
            sources,
            options: self.options.clone(),
        };
        let result = match ctx.compiler.compile(&request) {
            Ok(result) => result,
            Err(e) => return (TargetOutcome::failed(e.to_string()), Vec::new()),
        };

        let warnings = result.rendered_warnings();
        if result.is_fatal() {
            let outcome = TargetOutcome::Failed {
                reason: "compilation failed".to_string(),
                diagnostics: result.rendered_errors(),
            };
            return (outcome, warnings);
        }

        let Some(compiled) = result.compiled_code.as_deref() else {
            let outcome = TargetOutcome::failed("Compiler did not return compiledCode.");
            return (outcome, warnings);
        };

        let code = output::finalize(&ctx.config.output, compiled, &self.remove);
        let outcome = match output::write(output, &code, result.statistics) {
            Ok(WriteOutcome::Written(report)) => TargetOutcome::Written { stats: Some(report) },
            Ok(WriteOutcome::Skipped) => TargetOutcome::UnknownFailure,
            Err(e) => TargetOutcome::failed(format!("failed to write `{}`: {e}", output.display())),
        };
        (outcome, warnings)
    }
}
