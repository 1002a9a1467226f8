//! `[generators]` section configuration.
//!
//! Each language compiles `<dir>/<lang>.js` plus `<dir>/<lang>/*.js` into
//! `<lang>_compressed.js`.

use crate::compiler::{CompilationLevel, CompileOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorsConfig {
    pub languages: Vec<String>,
    pub dir: PathBuf,
    /// Declares `Blockly.Generator` so the compiler accepts the generators.
    pub prelude: PathBuf,
    pub remove: String,
    pub options: CompileOptions,
}

impl GeneratorsConfig {
    /// `<dir>/<lang>.js`
    pub fn main_file(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{language}.js"))
    }

    /// `<dir>/<lang>/`
    pub fn language_dir(&self, language: &str) -> PathBuf {
        self.dir.join(language)
    }

    /// `<lang>_compressed.js`, relative to the working directory.
    pub fn output(language: &str) -> PathBuf {
        PathBuf::from(format!("{language}_compressed.js"))
    }
}

impl Default for GeneratorsConfig {
    fn default() -> Self {
        Self {
            languages: vec!["arduino".into(), "python".into()],
            dir: PathBuf::from("generators"),
            prelude: PathBuf::from("build/gen_language.js"),
            remove: "var Blockly={Generator:{}};".into(),
            options: CompileOptions::with_level(CompilationLevel::Simple),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_generator_paths() {
        let config = test_parse_config("[generators]\nlanguages = [\"arduino\"]\n");
        let generators = &config.generators;
        assert_eq!(generators.languages, vec!["arduino"]);
        assert_eq!(generators.main_file("arduino"), PathBuf::from("generators/arduino.js"));
        assert_eq!(generators.language_dir("arduino"), PathBuf::from("generators/arduino"));
        assert_eq!(GeneratorsConfig::output("arduino"), PathBuf::from("arduino_compressed.js"));
    }
}
