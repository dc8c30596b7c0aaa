//! Command execution module.
//!
//! External collaborators (document compilers, spellcheckers, `tar`) are
//! opaque subprocesses. Only their exit status is interpreted.

use std::fmt::Debug;
use std::path::Path;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code (`None` if the process was killed by a signal)
    pub code: Option<i32>,

    /// Standard output (if captured)
    pub stdout: Option<String>,

    /// Standard error (if captured)
    pub stderr: Option<String>,

    /// Time taken to execute
    pub duration: Duration,
}

impl ExecutionResult {
    /// A successful result with no captured output.
    pub fn ok() -> Self {
        Self::with_code(Some(0))
    }

    /// A result with the given exit code and no captured output.
    pub fn with_code(code: Option<i32>) -> Self {
        Self { code, stdout: None, stderr: None, duration: Duration::ZERO }
    }

    fn from_status(
        status: ExitStatus,
        stdout: Option<String>,
        stderr: Option<String>,
        duration: Duration,
    ) -> Self {
        Self { code: status.code(), stdout, stderr, duration }
    }

    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs shell command strings in a given working directory.
///
/// Implementations block until the command finishes.
pub trait CommandRunner: Debug {
    /// Run `command` with `dir` as its working directory.
    ///
    /// A non-zero exit is reported through [`ExecutionResult`], not as an error.
    /// Errors mean the command could not be run at all.
    fn run(&self, command: &str, dir: &Path) -> anyhow::Result<ExecutionResult>;
}

/// Runs commands through the platform shell.
#[derive(Debug, Default, Clone)]
pub struct ShellRunner {
    /// Whether to capture output (vs pass through to terminal)
    pub capture_output: bool,
}

impl ShellRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to capture output.
    #[must_use]
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, dir: &Path) -> anyhow::Result<ExecutionResult> {
        let start = Instant::now();

        let (shell, shell_arg) = get_shell();

        let mut cmd = ProcessCommand::new(shell);
        cmd.arg(shell_arg);
        cmd.arg(command);
        cmd.current_dir(dir);

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
            cmd.stdin(Stdio::inherit());
        }

        debug!(command, dir = %dir.display(), "spawning shell command");
        let output = cmd.output()?;
        let duration = start.elapsed();

        let (stdout, stderr) = if self.capture_output {
            (
                Some(String::from_utf8_lossy(&output.stdout).to_string()),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            )
        } else {
            (None, None)
        };

        let result = ExecutionResult::from_status(output.status, stdout, stderr, duration);
        debug!(command, code = ?result.code, ?duration, "shell command finished");
        Ok(result)
    }
}

/// Prints commands instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &str, dir: &Path) -> anyhow::Result<ExecutionResult> {
        println!("[DRY RUN] {}: {}", dir.display(), command);
        Ok(ExecutionResult::ok())
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &str, dir: &Path) -> anyhow::Result<ExecutionResult> {
        (**self).run(command, dir)
    }
}

/// Get the shell and argument for the current platform.
fn get_shell() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}
