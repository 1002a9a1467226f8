//! Whitelisted `{key}` substitution for JavaScript templates.
//!
//! JavaScript is full of braces, so only the four Closure layout keys are
//! ever replaced; every other `{...}` is copied through untouched.

use crate::compiler::Selection;
use crate::utils::path::to_slash;

/// Values for the keys a template may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    pub closure_dir: String,
    pub closure_root: String,
    pub closure_library: String,
    pub closure_compiler: String,
}

impl TemplateVars {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            closure_dir: selection.env.dir.clone(),
            closure_root: to_slash(&selection.env.root),
            closure_library: selection.env.library.clone(),
            closure_compiler: selection.compiler_label(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        match key {
            "closure_dir" => Some(&self.closure_dir),
            "closure_root" => Some(&self.closure_root),
            "closure_library" => Some(&self.closure_library),
            "closure_compiler" => Some(&self.closure_compiler),
            _ => None,
        }
    }
}

/// Replace `{key}` for whitelisted keys only.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| vars.get(&after[..close]).map(|v| (close, v)));
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
