//! External process execution.
//!
//! Two tools run out of process: the Closure Compiler executable and the
//! Python i18n scripts. Both go through [`Cmd`].
//!
//! ```ignore
//! // Checked: a non-zero exit is an error carrying the tool's output
//! Cmd::new("python").arg("i18n/js_to_json.py").quiet().run()?;
//!
//! // Raw: the caller decides what the exit status means
//! let output = Cmd::new("google-closure-compiler").args(&flags).output()?;
//! ```

use crate::debug;
use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::process::{Command, Output, Stdio};

/// Command builder for external tools.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    /// Keep stderr of successful runs out of the debug log.
    quiet: bool,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add one argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.push(arg.as_ref());
        self
    }

    /// Add several arguments. Empty arguments are dropped.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.push(arg.as_ref());
        }
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    fn push(&mut self, arg: &OsStr) {
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
    }

    /// Run to completion; a non-zero exit status is an error.
    pub fn run(self) -> Result<Output> {
        let name = self.name();
        let quiet = self.quiet;
        let output = self.output()?;

        if !output.status.success() {
            bail!(failure_message(&name, &output));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !quiet && !stderr.is_empty() {
            debug!("exec"; "{}: {}", name, stderr);
        }
        Ok(output)
    }

    /// Run to completion and return the output whatever the exit status.
    ///
    /// Only a failure to spawn is an error. Stdin is closed.
    pub fn output(self) -> Result<Output> {
        let name = self.name();
        let args: Vec<_> = self.args.iter().map(|a| a.to_string_lossy()).collect();
        debug!("exec"; "{} {}", name, args.join(" "));
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))
    }

    fn name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Exit status, then stderr, then stdout (each only when non-empty).
fn failure_message(name: &str, output: &Output) -> String {
    let mut msg = format!("Command `{name}` failed with {}", output.status);
    for stream in [&output.stderr, &output.stdout] {
        let text = String::from_utf8_lossy(stream);
        let text = text.trim();
        if !text.is_empty() {
            msg.push('\n');
            msg.push_str(text);
        }
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args_dropped() {
        let cmd = Cmd::new("python").arg("").args(["a", "", "b"]).quiet();
        assert_eq!(cmd.program, OsString::from("python"));
        assert_eq!(cmd.args, vec![OsString::from("a"), OsString::from("b")]);
        assert!(cmd.quiet);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_stdout() {
        let output = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_keeps_failed_status() {
        let output = Cmd::new("sh").args(["-c", "echo oops >&2; exit 3"]).output().unwrap();
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("oops"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_fails_with_tool_output() {
        let err = Cmd::new("sh")
            .args(["-c", "echo 'bad input' >&2; exit 1"])
            .run()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Command `sh` failed"));
        assert!(msg.ends_with("bad input"));
    }

    #[test]
    fn test_missing_program_is_error() {
        assert!(Cmd::new("definitely-not-a-real-program-xyz").output().is_err());
    }
}
