//! Configuration section definitions.

mod blocks;
mod closure;
mod core;
mod generators;
mod langfiles;
mod output;

pub use blocks::{BlockGroup, BlocksConfig};
pub use closure::{ClosureConfig, ClosureEnv};
pub use self::core::{CoreConfig, VariantConfig};
pub use generators::GeneratorsConfig;
pub use langfiles::{LangfilesConfig, NON_LANGUAGE_FILES};
pub use output::OutputConfig;
