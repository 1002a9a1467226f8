//! Provider index and deterministic topological ordering.
//!
//! # Invariants
//! - Every identifier has exactly one providing module (checked on build)
//! - `order` never places a module before any module it requires
//! - Ties are broken by path, so unchanged inputs give the same sequence

use super::{BASE_PROVIDE, GraphError, Module};
use crate::utils::path::{relative_to, to_slash};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Dependency graph over a scanned module set.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Modules sorted by path; indices are stable for the graph's lifetime.
    modules: Vec<Module>,
    /// Provided identifier -> owning module index.
    providers: FxHashMap<String, usize>,
}

impl DependencyGraph {
    /// Index a module set.
    ///
    /// Fails if two modules provide the same identifier.
    pub fn new(mut modules: Vec<Module>) -> Result<Self, GraphError> {
        modules.sort_by(|a, b| a.path.cmp(&b.path));

        let mut providers = FxHashMap::default();
        for (index, module) in modules.iter().enumerate() {
            for provide in &module.provides {
                if let Some(&first) = providers.get(provide) {
                    let first: &Module = &modules[first];
                    return Err(GraphError::DuplicateProvide {
                        identifier: provide.clone(),
                        first: first.path.clone(),
                        second: module.path.clone(),
                    });
                }
                providers.insert(provide.clone(), index);
            }
        }

        Ok(Self { modules, providers })
    }

    /// All modules, sorted by path.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// The Closure bootstrap module, if one was scanned.
    pub fn base(&self) -> Option<&Module> {
        self.providers
            .get(BASE_PROVIDE)
            .map(|&i| &self.modules[i])
            .filter(|m| m.is_base)
    }

    /// Modules needed to define `entry_points`, dependencies first.
    ///
    /// Computes the reachability closure over requires, then sorts it
    /// topologically. When several modules are ready at once the one with
    /// the smallest path goes first.
    pub fn order(&self, entry_points: &[&str]) -> Result<Vec<&Module>, GraphError> {
        let edges = self.closure(entry_points)?;

        // Kahn: pending[m] = number of unemitted dependencies of m.
        let mut pending: BTreeMap<usize, usize> =
            edges.iter().map(|(&m, deps)| (m, deps.len())).collect();
        let mut dependents: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (&module, deps) in &edges {
            for &dep in deps {
                dependents.entry(dep).or_default().push(module);
            }
        }

        // Module indices follow path order, so BTreeSet order is path order.
        let mut ready: BTreeSet<usize> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(&m, _)| m)
            .collect();

        let mut ordered = Vec::with_capacity(edges.len());
        while let Some(next) = ready.pop_first() {
            pending.remove(&next);
            ordered.push(&self.modules[next]);

            for &dependent in dependents.get(&next).map(Vec::as_slice).unwrap_or_default() {
                if let Some(count) = pending.get_mut(&dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if !pending.is_empty() {
            return Err(GraphError::Cycle {
                chain: self.find_cycle(&edges, &pending),
            });
        }

        Ok(ordered)
    }

    /// The `goog.addDependency(...)` line for a module.
    ///
    /// `base_dir` is the directory holding `base.js`; the Closure loader
    /// resolves paths relative to it. Both paths must be normalized.
    pub fn deps_line(module: &Module, path: &Path, base_dir: &Path) -> String {
        let rel = to_slash(&relative_to(path, base_dir));
        format!(
            "goog.addDependency(\"{}\", {}, {});",
            rel,
            js_list(&module.provides),
            js_list(&module.requires)
        )
    }

    // -------------------------------------------------------------------------
    // Private
    // -------------------------------------------------------------------------

    /// Reachable modules from the entry points with their dependency edges.
    fn closure(
        &self,
        entry_points: &[&str],
    ) -> Result<BTreeMap<usize, BTreeSet<usize>>, GraphError> {
        let base = self
            .providers
            .get(BASE_PROVIDE)
            .copied()
            .filter(|&i| self.modules[i].is_base);

        let mut edges: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        let mut stack = Vec::new();

        for &entry in entry_points {
            let &index = self
                .providers
                .get(entry)
                .ok_or_else(|| GraphError::MissingProvider {
                    identifier: entry.to_string(),
                    required_by: None,
                })?;
            stack.push(index);
        }

        while let Some(index) = stack.pop() {
            if edges.contains_key(&index) {
                continue;
            }
            let module = &self.modules[index];
            let mut deps = BTreeSet::new();

            for require in &module.requires {
                let &dep = self
                    .providers
                    .get(require)
                    .ok_or_else(|| GraphError::MissingProvider {
                        identifier: require.clone(),
                        required_by: Some(module.path.clone()),
                    })?;
                if dep != index {
                    deps.insert(dep);
                }
            }
            if let Some(base) = base
                && base != index
            {
                deps.insert(base);
            }

            stack.extend(deps.iter().copied());
            edges.insert(index, deps);
        }

        Ok(edges)
    }

    /// Walk unresolved modules until one repeats; that loop is a cycle.
    ///
    /// Every module left in `pending` still waits on another pending module,
    /// so the walk always closes.
    fn find_cycle(
        &self,
        edges: &BTreeMap<usize, BTreeSet<usize>>,
        pending: &BTreeMap<usize, usize>,
    ) -> Vec<std::path::PathBuf> {
        let Some((&start, _)) = pending.iter().next() else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut current = start;
        loop {
            let next = edges[&current]
                .iter()
                .copied()
                .find(|dep| pending.contains_key(dep));
            let Some(next) = next else {
                break;
            };
            if let Some(pos) = path.iter().position(|&m| m == next) {
                path.drain(..pos);
                path.push(next);
                break;
            }
            path.push(next);
            current = next;
        }

        path.into_iter()
            .map(|i| self.modules[i].path.clone())
            .collect()
    }
}

/// Render identifiers as a JS array literal: `['a', 'b']`.
fn js_list(items: &BTreeSet<String>) -> String {
    let quoted: Vec<_> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn module(path: &str, provides: &[&str], requires: &[&str]) -> Module {
        let mut source = String::new();
        for p in provides {
            source.push_str(&format!("goog.provide('{p}');\n"));
        }
        for r in requires {
            source.push_str(&format!("goog.require('{r}');\n"));
        }
        Module::parse(path, &source)
    }

    fn paths(order: &[&Module]) -> Vec<String> {
        order.iter().map(|m| to_slash(&m.path)).collect()
    }

    #[test]
    fn two_modules_in_dependency_order() {
        let graph = DependencyGraph::new(vec![
            module("B.js", &["y"], &["x"]),
            module("A.js", &["x"], &[]),
        ])
        .unwrap();

        let order = graph.order(&["y"]).unwrap();
        assert_eq!(paths(&order), vec!["A.js", "B.js"]);
    }

    #[test]
    fn ordering_is_deterministic_across_runs() {
        let build = || {
            DependencyGraph::new(vec![
                module("core/d.js", &["D"], &["B", "C"]),
                module("core/c.js", &["C"], &["A"]),
                module("core/b.js", &["B"], &["A"]),
                module("core/a.js", &["A"], &[]),
            ])
            .unwrap()
        };
        let first = paths(&build().order(&["D"]).unwrap());
        let second = paths(&build().order(&["D"]).unwrap());
        assert_eq!(first, second);
        assert_eq!(first, vec!["core/a.js", "core/b.js", "core/c.js", "core/d.js"]);
    }

    #[test]
    fn input_order_does_not_change_output() {
        let modules = vec![
            module("z.js", &["Z"], &[]),
            module("a.js", &["A"], &[]),
            module("root.js", &["Root"], &["Z", "A"]),
        ];
        let mut reversed = modules.clone();
        reversed.reverse();

        let g1 = DependencyGraph::new(modules).unwrap();
        let g2 = DependencyGraph::new(reversed).unwrap();
        assert_eq!(
            paths(&g1.order(&["Root"]).unwrap()),
            paths(&g2.order(&["Root"]).unwrap())
        );
        assert_eq!(paths(&g1.order(&["Root"]).unwrap()), vec!["a.js", "z.js", "root.js"]);
    }

    #[test]
    fn closure_excludes_unreachable_modules() {
        let graph = DependencyGraph::new(vec![
            module("a.js", &["A"], &["B"]),
            module("b.js", &["B"], &["C"]),
            module("c.js", &["C"], &[]),
            module("unused.js", &["Unused"], &["A"]),
        ])
        .unwrap();

        let order = graph.order(&["A"]).unwrap();
        assert_eq!(paths(&order), vec!["c.js", "b.js", "a.js"]);
    }

    #[test]
    fn every_dependency_precedes_its_dependents() {
        let graph = DependencyGraph::new(vec![
            module("app.js", &["App"], &["Ui", "Net"]),
            module("ui.js", &["Ui"], &["Dom", "Util"]),
            module("net.js", &["Net"], &["Util"]),
            module("dom.js", &["Dom"], &["Util"]),
            module("util.js", &["Util"], &[]),
        ])
        .unwrap();

        let order = graph.order(&["App"]).unwrap();
        let position = |id: &str| {
            order
                .iter()
                .position(|m| m.provides.contains(id))
                .unwrap()
        };
        for m in &order {
            for req in &m.requires {
                assert!(position(req) < position(m.provides.iter().next().unwrap()));
            }
        }
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn cycle_is_fatal() {
        let graph = DependencyGraph::new(vec![
            module("A.js", &["a"], &["b"]),
            module("B.js", &["b"], &["a"]),
        ])
        .unwrap();

        match graph.order(&["a"]) {
            Err(GraphError::Cycle { chain }) => {
                assert_eq!(chain.first(), chain.last());
                assert!(chain.contains(&PathBuf::from("A.js")));
                assert!(chain.contains(&PathBuf::from("B.js")));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn cycle_behind_acyclic_prefix_is_reported() {
        let graph = DependencyGraph::new(vec![
            module("entry.js", &["E"], &["X"]),
            module("x.js", &["X"], &["Y"]),
            module("y.js", &["Y"], &["Z"]),
            module("z.js", &["Z"], &["X"]),
        ])
        .unwrap();

        let Err(GraphError::Cycle { chain }) = graph.order(&["E"]) else {
            panic!("expected cycle");
        };
        let names: Vec<_> = chain.iter().map(|p| to_slash(p)).collect();
        assert!(!names.contains(&"entry.js".to_string()));
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn missing_dependency_names_identifier() {
        let graph = DependencyGraph::new(vec![module("a.js", &["A"], &["X"])]).unwrap();

        match graph.order(&["A"]) {
            Err(GraphError::MissingProvider {
                identifier,
                required_by,
            }) => {
                assert_eq!(identifier, "X");
                assert_eq!(required_by, Some(PathBuf::from("a.js")));
            }
            other => panic!("expected missing provider, got {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_is_fatal() {
        let graph = DependencyGraph::new(vec![module("a.js", &["A"], &[])]).unwrap();
        let err = graph.order(&["Nope"]).unwrap_err();
        assert!(err.to_string().contains("(Nope)"));
    }

    #[test]
    fn duplicate_provide_is_rejected() {
        let err = DependencyGraph::new(vec![
            module("render_vertical.js", &["Blockly.render"], &[]),
            module("render_horizontal.js", &["Blockly.render"], &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateProvide { .. }));
    }

    #[test]
    fn self_require_is_ignored() {
        let graph = DependencyGraph::new(vec![module("a.js", &["A", "A.sub"], &["A.sub"])]).unwrap();
        assert_eq!(graph.order(&["A"]).unwrap().len(), 1);
    }

    #[test]
    fn base_module_goes_first() {
        let base = Module::parse("lib/goog/base.js", "/** @provideGoog */\n");
        let graph = DependencyGraph::new(vec![
            module("core/a.js", &["A"], &[]),
            module("core/b.js", &["B"], &["A"]),
            base,
        ])
        .unwrap();

        assert!(graph.base().is_some());
        let order = graph.order(&["B"]).unwrap();
        assert_eq!(
            paths(&order),
            vec!["lib/goog/base.js", "core/a.js", "core/b.js"]
        );
    }

    #[test]
    fn deps_line_format() {
        let m = module("/work/blocks/core/block.js", &["Blockly.Block"], &["goog.array", "Blockly.Xml"]);
        let line = DependencyGraph::deps_line(
            &m,
            Path::new("/work/blocks/core/block.js"),
            Path::new("/work/closure/goog"),
        );
        assert_eq!(
            line,
            "goog.addDependency(\"../../blocks/core/block.js\", ['Blockly.Block'], ['Blockly.Xml', 'goog.array']);"
        );
    }
}
