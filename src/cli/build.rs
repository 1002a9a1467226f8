//! Build orchestration.
//!
//! Build phases:
//! - **Select** - Probe the local compiler, fall back to the web service
//! - **Plan** - Scan sources, build variant graphs, list every target
//! - **Run** - All targets in parallel, each isolated from the others
//! - **Report** - Per-target results in plan order, then a summary
//!
//! Only selection and planning can fail the run. A failing target is
//! reported and the rest still complete.

use crate::{
    cli::Cli,
    compiler::{Compiler, select_backend},
    config::{BuildConfig, ClosureEnv},
    debug, log,
    logger::ProgressLine,
    target::{
        TargetContext, TargetReport, TemplateVars,
        plan::{self, Variant},
    },
    utils::plural_count,
};
use anyhow::{Context, Result};
use rayon::prelude::*;

/// Build every target the configuration describes.
pub fn build_all(config: &BuildConfig, cli: &Cli) -> Result<Vec<TargetReport>> {
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }
    let selection =
        select_backend(&config.closure, cli.remote).context("No usable Closure Compiler")?;
    let vars = TemplateVars::from_selection(&selection);
    let reports = build_with(config, selection.backend.compiler(), &selection.env, &vars)?;
    print_summary(&reports);
    Ok(reports)
}

/// Plan and run against an already selected backend.
pub fn build_with(
    config: &BuildConfig,
    compiler: &dyn Compiler,
    env: &ClosureEnv,
    vars: &TemplateVars,
) -> Result<Vec<TargetReport>> {
    let modules = plan::scan_sources(config, env)?;
    let variants: Vec<Variant> = plan::variants(config, &modules, env)?;
    let targets = plan::targets(config, &variants, env)?;
    log!("build"; "{} with {}", plural_count(targets.len(), "target"), compiler.name());

    let counts = ["loaders", "bundles", "langfiles"].map(|name| {
        let total = targets.iter().filter(|t| t.kind.counter() == name).count();
        (name, total)
    });
    let progress = ProgressLine::new(&counts);

    let ctx = TargetContext {
        config,
        compiler,
        env,
        vars,
    };
    let reports: Vec<TargetReport> = targets
        .par_iter()
        .map(|target| {
            let report = target.run(&ctx);
            progress.inc(target.kind.counter());
            report
        })
        .collect();
    progress.finish();

    for report in &reports {
        report.print();
    }
    Ok(reports)
}

fn print_summary(reports: &[TargetReport]) {
    log!("build"; "{}", summary(reports));
}

/// `3 targets built`, or the failed target names: `1 of 3 targets failed (blocks-common)`.
fn summary(reports: &[TargetReport]) -> String {
    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| !r.outcome.is_success())
        .map(|r| r.name.as_str())
        .collect();
    let total = plural_count(reports.len(), "target");
    if failed.is_empty() {
        format!("{total} built")
    } else {
        format!("{} of {total} failed ({})", failed.len(), failed.join(", "))
    }
}
