//! Dependency graph errors. All of them abort the build.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Missing provider for ({identifier}){}", required_by_suffix(.required_by))]
    MissingProvider {
        identifier: String,
        required_by: Option<PathBuf>,
    },

    #[error("Duplicate provide ({identifier}) in ({}, {})", .first.display(), .second.display())]
    DuplicateProvide {
        identifier: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Dependency cycle: {}", format_chain(.chain))]
    Cycle { chain: Vec<PathBuf> },
}

fn required_by_suffix(required_by: &Option<PathBuf>) -> String {
    match required_by {
        Some(path) => format!(" required by `{}`", path.display()),
        None => " (entry point)".to_string(),
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_provider_message_names_identifier() {
        let err = GraphError::MissingProvider {
            identifier: "Blockly.Xml".into(),
            required_by: Some(PathBuf::from("core/block.js")),
        };
        assert_eq!(
            err.to_string(),
            "Missing provider for (Blockly.Xml) required by `core/block.js`"
        );
    }

    #[test]
    fn test_cycle_message_lists_chain() {
        let err = GraphError::Cycle {
            chain: vec!["a.js".into(), "b.js".into(), "a.js".into()],
        };
        assert_eq!(err.to_string(), "Dependency cycle: a.js -> b.js -> a.js");
    }
}
