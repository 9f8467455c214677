//! Error types for incpush modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from version-control subprocess invocations.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("{0} not found on PATH. Install it or pick another backend with --vcs")]
    NotInstalled(String),

    #[error("Failed to spawn `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {output}",
            code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

/// Errors from bucket planning.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Cannot read size of '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from commit message template parsing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template field '{{{0}}}'. Use {{bucket}}, {{total}} or {{files}}")]
    UnknownField(String),

    #[error("Unbalanced brace at position {0}. Use {{{{ or }}}} for literal braces")]
    UnbalancedBrace(usize),

    #[error("Unsupported format spec ':{0}'. Use [[fill]align][0][width][d], e.g. {{bucket:03}}")]
    UnsupportedSpec(String),
}

/// Errors that abort an incremental push run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}
