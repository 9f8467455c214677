//! incpush - Commit and push a huge working-copy change in size-bounded buckets.
//!
//! # Overview
//!
//! Some version-control backends fail or time out when one changeset touches
//! too many files or bytes. incpush reads the pending changes from `hg` or
//! `git`, splits them into buckets bounded by file count and cumulative size,
//! commits each bucket separately, and pushes once at the end.

pub mod bucket;
pub mod error;
pub mod push;
pub mod vcs;

// Re-export commonly used types
pub use bucket::{Bucket, BucketLimits, BucketSet, SizeAccounting};
pub use error::{PlanError, RunError, TemplateError, VcsError};
pub use push::{MessageTemplate, RunConfig, RunSummary};
pub use vcs::{ChangeRecord, VcsExecutor, VcsKind};
