//! Version-control tool integration: subprocess executor and status parsing.

pub mod executor;
pub mod status;

pub use executor::{CommandOutput, ShellExecutor, VcsExecutor, VcsKind, check_vcs_installed};
pub use status::{ChangeRecord, parse_status, read_status};
