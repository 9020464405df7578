//! External generator invocation.
//!
//! The upstream table generators are opaque scripts: they take positional
//! arguments and print C source on standard output. [`Invoker`] abstracts a
//! single blocking call so the pipeline can be driven by a fake in tests;
//! [`ProcessInvoker`] is the real subprocess-backed implementation.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// A single external tool call whose stdout is captured into a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run (looked up on `PATH`)
    pub program: String,
    /// Positional arguments, in order
    pub args: Vec<OsString>,
    /// File that receives the program's standard output
    pub stdout_path: PathBuf,
}

impl Invocation {
    /// Creates an invocation with no arguments
    pub fn new(program: impl Into<String>, stdout_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout_path: stdout_path.into(),
        }
    }

    /// Appends a positional argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Human-readable command line, for logs
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Outcome of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    /// File holding the captured standard output
    pub stdout_path: PathBuf,
    /// Captured standard error (tools may warn on success)
    pub stderr: String,
    /// Exit status, always 0 for a returned output
    pub exit_code: i32,
}

/// Runs external generator commands.
///
/// Implementations must block until the command finishes. A non-zero exit is
/// reported as [`Error::ExternalTool`], never as an `Ok` output.
pub trait Invoker {
    /// Run the command and capture its stdout into `invocation.stdout_path`
    fn invoke(&self, invocation: &Invocation) -> Result<InvocationOutput>;
}

impl<T: Invoker + ?Sized> Invoker for &T {
    fn invoke(&self, invocation: &Invocation) -> Result<InvocationOutput> {
        (**self).invoke(invocation)
    }
}

/// Invoker that spawns real subprocesses
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    /// Creates an invoker that runs commands in the current directory
    pub fn new() -> Self {
        Self
    }
}

impl Invoker for ProcessInvoker {
    fn invoke(&self, invocation: &Invocation) -> Result<InvocationOutput> {
        debug!("Running: {}", invocation.display());

        let stdout = create_stdout_file(&invocation.stdout_path)?;

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped());

        // stdout goes straight to the file, so only stderr is collected here
        let output = cmd
            .output()
            .map_err(|e| Error::spawn(&invocation.program, e))?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(Error::external_tool(
                &invocation.program,
                exit_code,
                stderr,
            ));
        }

        trace!(
            "{} finished, stdout in {}",
            invocation.program,
            invocation.stdout_path.display()
        );

        Ok(InvocationOutput {
            stdout_path: invocation.stdout_path.clone(),
            stderr,
            exit_code: 0,
        })
    }
}

fn create_stdout_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::file_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("perl", "/tmp/out")
            .arg("objects.pl")
            .arg("-n")
            .arg("objects.txt");

        assert_eq!(inv.program, "perl");
        assert_eq!(inv.args.len(), 3);
        assert_eq!(inv.display(), "perl objects.pl -n objects.txt");
        assert_eq!(inv.stdout_path, PathBuf::from("/tmp/out"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_invoker_captures_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out.txt");

        let inv = Invocation::new("sh", &out)
            .arg("-c")
            .arg("printf 'a\\tb\\n'; echo warn 1>&2");
        let result = ProcessInvoker::new().invoke(&inv).unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout_path, out);
        assert!(result.stderr.contains("warn"));
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a\tb\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_invoker_truncates_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out.txt");
        std::fs::write(&out, "stale content that is longer").unwrap();

        let inv = Invocation::new("sh", &out).arg("-c").arg("echo new");
        ProcessInvoker::new().invoke(&inv).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "new\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_invoker_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out.txt");

        let inv = Invocation::new("sh", &out)
            .arg("-c")
            .arg("echo 'bad object' 1>&2; exit 3");
        let err = ProcessInvoker::new().invoke(&inv).unwrap_err();

        match err {
            Error::ExternalTool {
                program,
                exit_code,
                stderr,
            } => {
                assert_eq!(program, "sh");
                assert_eq!(exit_code, 3);
                assert!(stderr.contains("bad object"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_invoker_missing_program() {
        let temp_dir = TempDir::new().unwrap();
        let inv = Invocation::new("oidtrim-no-such-program", temp_dir.path().join("out"));

        let err = ProcessInvoker::new().invoke(&inv).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
