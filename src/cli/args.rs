//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Build the Blockly loaders, compressed bundles and message files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: blockbuild.toml, optional)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print debug output (backend probing, scanned roots, tool invocations)
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Also regenerate the per-language message files
    #[arg(short, long)]
    pub langfiles: bool,

    /// Skip the local compiler probe and use the compiler web service
    #[arg(short, long)]
    pub remote: bool,
}

impl Cli {
    /// Default config file name, looked up in the working directory.
    pub const DEFAULT_CONFIG: &'static str = "blockbuild.toml";

    /// Config file to load, and whether it was requested explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(Self::DEFAULT_CONFIG), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["blockbuild"]).unwrap();
        assert!(!cli.verbose && !cli.langfiles && !cli.remote);
        assert_eq!(cli.config_path(), (PathBuf::from("blockbuild.toml"), false));
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "blockbuild",
            "-C",
            "ci.toml",
            "--verbose",
            "--langfiles",
            "--remote",
            "--color",
            "never",
        ])
        .unwrap();
        assert!(cli.verbose && cli.langfiles && cli.remote);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config_path(), (PathBuf::from("ci.toml"), true));
    }

    #[test]
    fn test_rejects_positional() {
        assert!(Cli::try_parse_from(["blockbuild", "build"]).is_err());
    }
}
