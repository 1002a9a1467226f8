//! Target planning.
//!
//! Everything that can make the whole run fail happens here, before any
//! worker starts: scanning, provider conflicts, missing providers, cycles,
//! missing bundle sources and a missing `messages.js`.

use super::{BuildTarget, Bundle, BundleInput, TargetKind};
use crate::compiler::CompileOptions;
use crate::config::{BuildConfig, ClosureEnv, GeneratorsConfig, VariantConfig};
use crate::freshness::FreshnessError;
use crate::graph::{DependencyGraph, GraphError, Module, list_scripts, scan};
use crate::langfiles::LangfilesPlan;
use crate::{debug, log};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{variant} variant: {source}")]
    Graph {
        variant: String,
        #[source]
        source: GraphError,
    },

    #[error(transparent)]
    Scan(#[from] GraphError),

    #[error("source `{}` of target `{target}` not found", .path.display())]
    MissingSource { target: String, path: PathBuf },

    #[error(transparent)]
    Freshness(#[from] FreshnessError),
}

/// One orientation of the core with its own dependency graph.
#[derive(Debug)]
pub struct Variant {
    pub config: VariantConfig,
    pub graph: DependencyGraph,
}

/// Scan the project roots and the Closure library once.
pub fn scan_sources(config: &BuildConfig, env: &ClosureEnv) -> Result<Vec<Module>, PlanError> {
    let mut roots = config.core.roots.clone();
    roots.push(env.library_dir());
    let modules = scan(&roots)?;
    debug!("scan"; "{} modules under {} roots", modules.len(), roots.len());
    Ok(modules)
}

/// Build and check one graph per orientation variant.
///
/// Each graph must order the core entry points and every identifier the
/// project provides (what the loader will `goog.require`).
pub fn variants(
    config: &BuildConfig,
    modules: &[Module],
    env: &ClosureEnv,
) -> Result<Vec<Variant>, PlanError> {
    config
        .core
        .variants
        .iter()
        .map(|variant| {
            let err = |source| PlanError::Graph {
                variant: variant.name.clone(),
                source,
            };

            let kept: Vec<Module> = modules
                .iter()
                .filter(|m| !m.path_ends_with(&variant.exclude))
                .cloned()
                .collect();
            let graph = DependencyGraph::new(kept).map_err(err)?;

            if graph.base().is_none() {
                log!("warning"; "{}: Closure base.js not found, loader paths are relative to the working directory", variant.name);
            }

            let entry_points: Vec<&str> = config.core.entry_points.iter().map(String::as_str).collect();
            graph.order(&entry_points).map_err(err)?;

            let provides: Vec<&str> = graph
                .modules()
                .iter()
                .filter(|m| !env.is_library(&m.path))
                .flat_map(|m| m.provides.iter().map(String::as_str))
                .collect();
            graph.order(&provides).map_err(err)?;

            Ok(Variant {
                config: variant.clone(),
                graph,
            })
        })
        .collect()
}

/// The full target list, in report order.
pub fn targets<'a>(
    config: &BuildConfig,
    variants: &'a [Variant],
    env: &ClosureEnv,
) -> Result<Vec<BuildTarget<'a>>, PlanError> {
    let mut targets = Vec::new();

    for variant in variants {
        targets.push(BuildTarget {
            name: format!("uncompressed-{}", variant.config.name),
            output: variant.config.loader.clone(),
            kind: TargetKind::Loader(&variant.graph),
        });
    }

    for variant in variants {
        targets.push(core_bundle(config, variant, env)?);
    }

    for group in &config.blocks.groups {
        let name = format!("blocks-{}", group.name);
        let mut files = vec![config.blocks.prelude.clone()];
        let scripts = list_scripts(&group.dir);
        if scripts.is_empty() {
            log!("warning"; "{}: no scripts in `{}`", name, group.dir.display());
        }
        files.extend(scripts);
        files.extend(config.blocks.extra.iter().cloned());
        targets.push(bundle(
            name,
            group.output.clone(),
            files,
            config.blocks.options.clone(),
            &config.blocks.remove,
        )?);
    }

    let generators = &config.generators;
    for language in &generators.languages {
        let mut files = vec![generators.prelude.clone(), generators.main_file(language)];
        files.extend(list_scripts(&generators.language_dir(language)));
        targets.push(bundle(
            format!("generator-{language}"),
            GeneratorsConfig::output(language),
            files,
            generators.options.clone(),
            &generators.remove,
        )?);
    }

    if config.langfiles.enable {
        targets.push(BuildTarget {
            name: "langfiles".into(),
            output: config.langfiles.js_dir.clone(),
            kind: TargetKind::Langfiles(LangfilesPlan::new(&config.langfiles)?),
        });
    }

    Ok(targets)
}

/// Compressed core: the entry points' dependency closure, in order.
fn core_bundle<'a>(
    config: &BuildConfig,
    variant: &Variant,
    env: &ClosureEnv,
) -> Result<BuildTarget<'a>, PlanError> {
    let entry_points: Vec<&str> = config.core.entry_points.iter().map(String::as_str).collect();
    let ordered = variant
        .graph
        .order(&entry_points)
        .map_err(|source| PlanError::Graph {
            variant: variant.config.name.clone(),
            source,
        })?;

    let inputs = ordered
        .into_iter()
        .map(|m| BundleInput {
            path: m.path.clone(),
            library: env.is_library(&m.path),
        })
        .collect();

    Ok(BuildTarget {
        name: format!("compressed-{}", variant.config.name),
        output: variant.config.bundle.clone(),
        kind: TargetKind::Bundle(Bundle {
            inputs,
            options: config.core.options.clone(),
            remove: String::new(),
        }),
    })
}

/// A bundle over a fixed file list; every file must exist.
fn bundle<'a>(
    name: String,
    output: PathBuf,
    files: Vec<PathBuf>,
    options: CompileOptions,
    remove: &str,
) -> Result<BuildTarget<'a>, PlanError> {
    if let Some(missing) = files.iter().find(|f| !f.is_file()) {
        return Err(PlanError::MissingSource {
            target: name,
            path: missing.clone(),
        });
    }
    Ok(BuildTarget {
        name,
        output,
        kind: TargetKind::Bundle(Bundle {
            inputs: files.into_iter().map(BundleInput::project).collect(),
            options,
            remove: remove.to_string(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::section::BlockGroup;
    use crate::config::test_parse_config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// A miniature Blockly checkout rooted in `dir`, with absolute paths.
    fn project(dir: &Path) -> (BuildConfig, ClosureEnv) {
        write(dir, "closure/lib/closure/goog/base.js", "/** @provideGoog */\nvar goog = {};");
        write(dir, "closure/lib/closure/goog/dom/dom.js", "goog.provide('goog.dom');");
        write(
            dir,
            "core/blockly.js",
            "goog.provide('Blockly');\ngoog.require('Blockly.BlockSvg.render');\ngoog.require('goog.dom');",
        );
        write(
            dir,
            "core/block_render_svg_vertical.js",
            "goog.provide('Blockly.BlockSvg.render');",
        );
        write(
            dir,
            "core/block_render_svg_horizontal.js",
            "goog.provide('Blockly.BlockSvg.render');",
        );
        write(dir, "core/colours.js", "goog.provide('Blockly.Colours');");
        write(dir, "core/constants.js", "goog.provide('Blockly.constants');");
        write(dir, "build/gen_blocks.js", "var Blockly={Blocks:{}};");
        write(dir, "build/gen_language.js", "var Blockly={Generator:{}};");
        write(dir, "blocks_common/math.js", "Blockly.Blocks.math = {};");
        write(dir, "blocks_common/colour.js", "Blockly.Blocks.colour = {};");
        write(dir, "generators/python.js", "Blockly.Python = new Blockly.Generator('Python');");
        write(dir, "generators/python/text.js", "Blockly.Python.text = {};");
        write(dir, "generators/python/math.js", "Blockly.Python.math = {};");

        let mut config = test_parse_config("[generators]\nlanguages = [\"python\"]\n");
        config.core.roots = vec![dir.join("core")];
        config.core.entry_file = PathBuf::from("core/blockly.js");
        for variant in &mut config.core.variants {
            variant.loader = dir.join(&variant.loader);
            variant.bundle = dir.join(&variant.bundle);
        }
        config.blocks.groups = vec![BlockGroup {
            name: "common".into(),
            dir: dir.join("blocks_common"),
            output: dir.join("blocks_compressed.js"),
        }];
        config.blocks.prelude = dir.join("build/gen_blocks.js");
        config.blocks.extra = vec![dir.join("core/colours.js"), dir.join("core/constants.js")];
        config.generators.dir = dir.join("generators");
        config.generators.prelude = dir.join("build/gen_language.js");

        let env = ClosureEnv {
            dir: "..".into(),
            root: dir.join("closure"),
            library: "lib".into(),
        };
        (config, env)
    }

    fn file_names(target: &BuildTarget<'_>) -> Vec<String> {
        let TargetKind::Bundle(bundle) = &target.kind else {
            panic!("{} is not a bundle", target.name);
        };
        bundle
            .inputs
            .iter()
            .map(|i| i.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_full_plan() {
        let dir = TempDir::new().unwrap();
        let (config, env) = project(dir.path());

        let modules = scan_sources(&config, &env).unwrap();
        let variants = variants(&config, &modules, &env).unwrap();
        let targets = targets(&config, &variants, &env).unwrap();

        let names: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "uncompressed-vertical",
                "uncompressed-horizontal",
                "compressed-vertical",
                "compressed-horizontal",
                "blocks-common",
                "generator-python",
            ]
        );

        assert_eq!(
            file_names(&targets[2]),
            vec!["base.js", "dom.js", "block_render_svg_vertical.js", "blockly.js"]
        );
        assert_eq!(
            file_names(&targets[3]),
            vec!["base.js", "dom.js", "block_render_svg_horizontal.js", "blockly.js"]
        );
        assert_eq!(
            file_names(&targets[4]),
            vec!["gen_blocks.js", "colour.js", "math.js", "colours.js", "constants.js"]
        );
        assert_eq!(
            file_names(&targets[5]),
            vec!["gen_language.js", "python.js", "math.js", "text.js"]
        );

        let TargetKind::Bundle(core) = &targets[2].kind else {
            unreachable!()
        };
        let library: Vec<_> = core.inputs.iter().map(|i| i.library).collect();
        assert_eq!(library, vec![true, true, false, false]);
        assert!(core.remove.is_empty());
    }

    #[test]
    fn test_variants_exclude_other_orientation() {
        let dir = TempDir::new().unwrap();
        let (config, env) = project(dir.path());
        let modules = scan_sources(&config, &env).unwrap();

        // Unfiltered, the two renderers provide the same identifier.
        assert!(matches!(
            DependencyGraph::new(modules.clone()),
            Err(GraphError::DuplicateProvide { .. })
        ));

        let variants = variants(&config, &modules, &env).unwrap();
        assert!(
            variants[0]
                .graph
                .modules()
                .iter()
                .all(|m| !m.path_ends_with("block_render_svg_horizontal.js"))
        );
    }

    #[test]
    fn test_missing_provider_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (config, env) = project(dir.path());
        write(dir.path(), "core/field.js", "goog.provide('Blockly.Field');\ngoog.require('Blockly.Nope');");

        let modules = scan_sources(&config, &env).unwrap();
        let err = variants(&config, &modules, &env).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Graph {
                source: GraphError::MissingProvider { .. },
                ..
            }
        ));
        assert!(err.to_string().starts_with("vertical variant: "));
    }

    #[test]
    fn test_cycle_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (config, env) = project(dir.path());
        write(dir.path(), "core/a.js", "goog.provide('A');\ngoog.require('B');");
        write(dir.path(), "core/b.js", "goog.provide('B');\ngoog.require('A');");

        let modules = scan_sources(&config, &env).unwrap();
        let err = variants(&config, &modules, &env).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Graph {
                source: GraphError::Cycle { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_generator_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (mut config, env) = project(dir.path());
        config.generators.languages = vec!["lua".into()];

        let modules = scan_sources(&config, &env).unwrap();
        let variants = variants(&config, &modules, &env).unwrap();
        let err = targets(&config, &variants, &env).unwrap_err();
        let PlanError::MissingSource { target, path } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(target, "generator-lua");
        assert!(path.ends_with("generators/lua.js"));
    }

    #[test]
    fn test_langfiles_planned_when_enabled() {
        let dir = TempDir::new().unwrap();
        let (mut config, env) = project(dir.path());
        config.langfiles.enable = true;
        config.langfiles.messages = dir.path().join("msg/messages.js");
        config.langfiles.json_dir = dir.path().join("msg/json");

        let modules = scan_sources(&config, &env).unwrap();
        let variants = variants(&config, &modules, &env).unwrap();
        assert!(matches!(
            targets(&config, &variants, &env),
            Err(PlanError::Freshness(FreshnessError::SourceMissing(_)))
        ));

        write(dir.path(), "msg/messages.js", "");
        let targets = targets(&config, &variants, &env).unwrap();
        let last = targets.last().unwrap();
        assert_eq!(last.name, "langfiles");
        assert!(matches!(&last.kind, TargetKind::Langfiles(plan) if plan.stale));
    }
}
