//! Local backend: run the Closure Compiler executable.

use super::{CompileError, CompileRequest, CompileResult, Compiler, Diagnostic, Statistics};
use crate::debug;
use crate::utils::exec::Cmd;
use std::fs;
use std::path::{Path, PathBuf};

/// Options the executable does not understand.
const FILTERED_KEYS: &[&str] = &["use_closure_library"];

/// Compiler backed by a local executable.
#[derive(Debug, Clone)]
pub struct LocalCompiler {
    program: PathBuf,
    /// Pass arguments through `<target>.config` instead of the command line.
    flagfile: bool,
}

impl LocalCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            flagfile: cfg!(windows),
        }
    }

    #[cfg(test)]
    fn with_flagfile(mut self, flagfile: bool) -> Self {
        self.flagfile = flagfile;
        self
    }

    /// Locate the executable on `PATH` (or accept an explicit path).
    pub fn find(name: &str) -> Option<Self> {
        which::which(name).ok().map(Self::new)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Compile a fixed input and compare stdout byte-for-byte with the
    /// expected output.
    pub fn probe(&self, input: &Path, expected: &Path) -> bool {
        let Ok(expected) = fs::read(expected) else {
            debug!("compiler"; "sanity output `{}` is missing", expected.display());
            return false;
        };
        match Cmd::new(&self.program).arg(input).output() {
            Ok(output) => output.stdout == expected,
            Err(e) => {
                debug!("compiler"; "sanity check failed: {:#}", e);
                false
            }
        }
    }

    /// Translate a request into command-line arguments.
    ///
    /// Options become `--key value` pairs, sources follow positionally.
    fn arguments(request: &CompileRequest) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in request.options.params() {
            if FILTERED_KEYS.contains(&key) {
                continue;
            }
            args.push(format!("--{key}"));
            args.push(value);
        }
        args.extend(request.sources.iter().map(|s| s.path.display().to_string()));
        args
    }

    /// Windows caps command lines at 8191 characters, so arguments go into a
    /// flag file instead. Backslashes are doubled for the flag file parser.
    fn write_flagfile(request: &CompileRequest, args: &[String]) -> Result<PathBuf, CompileError> {
        let path = PathBuf::from(format!("{}.config", request.target));
        fs::write(&path, flagfile_contents(args)).map_err(|e| CompileError::Io(path.clone(), e))?;
        Ok(path)
    }
}

fn flagfile_contents(args: &[String]) -> String {
    args.join(" ").replace('\\', "\\\\")
}

impl Compiler for LocalCompiler {
    fn name(&self) -> &'static str {
        "local"
    }

    fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        let args = Self::arguments(request);

        let (output, flagfile) = if self.flagfile {
            let flagfile = Self::write_flagfile(request, &args)?;
            let output = Cmd::new(&self.program)
                .arg("--flagfile")
                .arg(&flagfile)
                .output();
            (output, Some(flagfile))
        } else {
            (Cmd::new(&self.program).args(&args).output(), None)
        };

        if let Some(flagfile) = flagfile
            && let Err(e) = fs::remove_file(&flagfile)
        {
            debug!("compiler"; "failed to remove `{}`: {}", flagfile.display(), e);
        }

        let output = output.map_err(|e| CompileError::Process(format!("{e:#}")))?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        let mut result = CompileResult {
            inputs: request.sources.iter().map(|s| s.name.clone()).collect(),
            ..CompileResult::default()
        };

        if !output.status.success() {
            let message = if stderr.is_empty() {
                format!("compiler exited with {}", output.status)
            } else {
                stderr
            };
            result.errors.push(Diagnostic::message(message));
            return Ok(result);
        }

        if !stderr.is_empty() {
            result.warnings.push(Diagnostic::message(stderr));
        }

        result.statistics = Statistics {
            original_size: request.original_size(),
            compressed_size: stdout.len() as u64,
        };
        result.compiled_code = Some(stdout);
        Ok(result)
    }
}
