//! Bucket planning and per-bucket commits.

pub mod committer;
pub mod planner;

pub use committer::{SUB_BATCH_SIZE, commit_bucket, split_interleaved};
pub use planner::{
    BYTES_PER_MB, Bucket, BucketLimits, BucketSet, DEFAULT_MAX_FILES, DEFAULT_MAX_SIZE_MB,
    SizeAccounting, file_size, plan, plan_with,
};
