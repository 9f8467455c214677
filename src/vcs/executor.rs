//! Subprocess seam for the version-control tool: status, add, commit, push.
//!
//! All operations use `std::process::Command` to shell out to the system
//! `hg` or `git` binary, inheriting the user's existing configuration,
//! SSH agent, and credential store. Every call blocks until the child exits.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::VcsError;

/// Which version-control tool to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum VcsKind {
    /// Mercurial (`hg`).
    #[default]
    Hg,
    /// Git (`git`).
    Git,
}

impl VcsKind {
    /// Executable name looked up on PATH.
    pub fn program(self) -> &'static str {
        match self {
            VcsKind::Hg => "hg",
            VcsKind::Git => "git",
        }
    }

    /// Options placed ahead of every subcommand.
    ///
    /// Git quotes and octal-escapes non-ASCII paths in status output unless
    /// `core.quotePath` is off.
    fn global_args(self) -> &'static [&'static str] {
        match self {
            VcsKind::Hg => &[],
            VcsKind::Git => &["-c", "core.quotePath=false"],
        }
    }

    fn status_args(self) -> &'static [&'static str] {
        match self {
            VcsKind::Hg => &["status"],
            VcsKind::Git => &["status", "--porcelain", "--untracked-files=all"],
        }
    }

    fn add_args(self) -> &'static [&'static str] {
        match self {
            VcsKind::Hg => &["add"],
            VcsKind::Git => &["add", "--"],
        }
    }

    /// `hg push --chunked` keeps large pushes from timing out.
    fn push_args(self) -> &'static [&'static str] {
        match self {
            VcsKind::Hg => &["push", "--chunked"],
            VcsKind::Git => &["push"],
        }
    }
}

/// Exit status and captured output of one finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Command line as displayed in diagnostics.
    pub command: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout followed by stderr.
    pub output: String,
}

impl CommandOutput {
    /// Build a successful result, mostly useful for test doubles.
    pub fn ok(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            code: Some(0),
            output: output.into(),
        }
    }

    /// Build a result with a non-zero exit code.
    pub fn failed(command: impl Into<String>, code: i32, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            code: Some(code),
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into `VcsError::CommandFailed`, returning the
    /// captured output otherwise.
    pub fn into_result(self) -> Result<String, VcsError> {
        if self.success() {
            Ok(self.output)
        } else {
            Err(VcsError::CommandFailed {
                command: self.command,
                code: self.code,
                output: self.output.trim().to_string(),
            })
        }
    }
}

/// Trait for executing version-control commands against one repository.
///
/// This abstraction allows mocking the subprocess in tests. Implementations
/// return `Err` only when the command could not be run at all; a command
/// that ran and failed comes back as a `CommandOutput` with a non-zero code.
#[cfg_attr(test, mockall::automock)]
pub trait VcsExecutor {
    /// List pending changes.
    fn status(&self) -> Result<CommandOutput, VcsError>;

    /// Stage the given repository-relative paths.
    fn add(&self, paths: &[String]) -> Result<CommandOutput, VcsError>;

    /// Commit whatever is staged with the given message.
    fn commit(&self, message: &str) -> Result<CommandOutput, VcsError>;

    /// Push all local commits to the default remote.
    fn push(&self) -> Result<CommandOutput, VcsError>;
}

/// Executor that spawns the real `hg` or `git` binary inside the repository.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    kind: VcsKind,
    repo_path: PathBuf,
}

impl ShellExecutor {
    pub fn new(kind: VcsKind, repo_path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            repo_path: repo_path.into(),
        }
    }

    fn run<S: AsRef<str>>(&self, base: &[&str], extra: &[S]) -> Result<CommandOutput, VcsError> {
        let program = self.kind.program();
        let mut args: Vec<&str> = self.kind.global_args().to_vec();
        args.extend_from_slice(base);
        args.extend(extra.iter().map(|s| s.as_ref()));

        let command = format!("{} {}", program, args.join(" "));
        debug!("Running `{}` in {}", command, self.repo_path.display());

        let output = Command::new(program)
            .args(&args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|source| VcsError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            command,
            code: output.status.code(),
            output: captured,
        })
    }
}

impl VcsExecutor for ShellExecutor {
    fn status(&self) -> Result<CommandOutput, VcsError> {
        self.run::<&str>(self.kind.status_args(), &[])
    }

    fn add(&self, paths: &[String]) -> Result<CommandOutput, VcsError> {
        self.run(self.kind.add_args(), paths)
    }

    fn commit(&self, message: &str) -> Result<CommandOutput, VcsError> {
        self.run(&["commit", "-m"], &[message])
    }

    fn push(&self) -> Result<CommandOutput, VcsError> {
        self.run::<&str>(self.kind.push_args(), &[])
    }
}

/// Check that the selected tool is installed and accessible.
///
/// Uses the `which` crate for cross-platform executable detection.
pub fn check_vcs_installed(kind: VcsKind) -> Result<(), VcsError> {
    which::which(kind.program())
        .map(|_| ())
        .map_err(|_| VcsError::NotInstalled(kind.program().to_string()))
}
