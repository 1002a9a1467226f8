//! Build targets.
//!
//! A target is one output file (or file family) with everything needed to
//! produce it decided up front by [`plan`]. Running a target never touches
//! another target's output and never panics the run: every failure ends up
//! in its [`TargetReport`].
//!
//! # Kinds
//!
//! | Kind        | Output                         | Work                               |
//! |-------------|--------------------------------|------------------------------------|
//! | `Loader`    | `blockly_uncompressed_*.js`    | template + addDependency lines     |
//! | `Bundle`    | `*_compressed.js`              | compile + post-process             |
//! | `Langfiles` | `msg/js/<lang>.js`             | i18n tools, staleness gated        |

mod bundle;
mod loader;
pub mod plan;
mod template;

pub use bundle::{Bundle, BundleInput};
pub use loader::Loader;
pub use template::TemplateVars;

use crate::compiler::Compiler;
use crate::config::{BuildConfig, ClosureEnv};
use crate::graph::DependencyGraph;
use crate::langfiles::{self, LangfilesPlan};
use crate::log;
use crate::output::{self, SizeReport};
use std::path::PathBuf;

/// One planned unit of work.
#[derive(Debug)]
pub struct BuildTarget<'a> {
    pub name: String,
    pub output: PathBuf,
    pub kind: TargetKind<'a>,
}

#[derive(Debug)]
pub enum TargetKind<'a> {
    /// Uncompressed loader over an orientation variant's graph.
    Loader(&'a DependencyGraph),
    Bundle(Bundle),
    Langfiles(LangfilesPlan),
}

impl TargetKind<'_> {
    /// Progress counter the target is counted under.
    pub const fn counter(&self) -> &'static str {
        match self {
            Self::Loader(_) => "loaders",
            Self::Bundle(_) => "bundles",
            Self::Langfiles(_) => "langfiles",
        }
    }
}

/// Shared, read-only state every target runs against.
pub struct TargetContext<'a> {
    pub config: &'a BuildConfig,
    pub compiler: &'a dyn Compiler,
    pub env: &'a ClosureEnv,
    pub vars: &'a TemplateVars,
}

/// How a target ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Output written; bundles carry their compression summary.
    Written { stats: Option<SizeReport> },
    /// External tools ran; per-file results.
    Generated {
        created: Vec<PathBuf>,
        missing: Vec<PathBuf>,
    },
    Failed {
        reason: String,
        diagnostics: Vec<String>,
    },
    /// The compiler returned without error but reported no sizes.
    UnknownFailure,
}

impl TargetOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Written { .. } => true,
            Self::Generated { missing, .. } => missing.is_empty(),
            Self::Failed { .. } | Self::UnknownFailure => false,
        }
    }
}

/// Result of one target, printed by the coordinator.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    pub output: PathBuf,
    pub outcome: TargetOutcome,
    pub warnings: Vec<String>,
}

impl TargetReport {
    pub fn print(&self) {
        for warning in &self.warnings {
            log!("warning"; "{}: {}", self.output.display(), warning);
        }
        match &self.outcome {
            TargetOutcome::Written { stats } => {
                log!("success"; "{}", self.output.display());
                if let Some(stats) = stats {
                    log!("success"; "{}", stats);
                }
            }
            TargetOutcome::Generated { created, missing } => {
                for path in created {
                    log!("success"; "{}", path.display());
                }
                for path in missing {
                    log!("error"; "failed to create {}", path.display());
                }
            }
            TargetOutcome::Failed {
                reason,
                diagnostics,
            } => {
                log!("error"; "{}: {}", self.output.display(), reason);
                for diagnostic in diagnostics {
                    eprintln!("{diagnostic}");
                }
            }
            TargetOutcome::UnknownFailure => {
                log!("error"; "{}: unknown error, compiler reported no output", self.output.display());
            }
        }
    }
}

impl BuildTarget<'_> {
    /// Produce this target's output.
    pub fn run(&self, ctx: &TargetContext<'_>) -> TargetReport {
        let (outcome, warnings) = match &self.kind {
            TargetKind::Loader(graph) => (self.run_loader(graph, ctx), Vec::new()),
            TargetKind::Bundle(bundle) => bundle.run(&self.name, &self.output, ctx),
            TargetKind::Langfiles(plan) => (langfiles::run(plan, &ctx.config.langfiles), Vec::new()),
        };
        TargetReport {
            name: self.name.clone(),
            output: self.output.clone(),
            outcome,
            warnings,
        }
    }

    fn run_loader(&self, graph: &DependencyGraph, ctx: &TargetContext<'_>) -> TargetOutcome {
        let code = Loader {
            graph,
            env: ctx.env,
            vars: ctx.vars,
            header: &ctx.config.output.header,
            entry_file: &ctx.config.core.entry_file,
        }
        .render();

        match output::write_file(&self.output, &code) {
            Ok(()) => TargetOutcome::Written { stats: None },
            Err(e) => TargetOutcome::failed(format!("failed to write `{}`: {e}", self.output.display())),
        }
    }
}
