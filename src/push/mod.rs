//! Incremental push pipeline: plan buckets, commit each one, push once.
//!
//! Runs strictly in sequence. The first failing command aborts the run;
//! buckets committed before it stay in local history and are not pushed.

pub mod template;
pub mod timer;

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::bucket::{BucketLimits, commit_bucket, file_size, plan_with};
use crate::error::{RunError, VcsError};
use crate::vcs::{ShellExecutor, VcsExecutor, VcsKind, read_status};

pub use self::template::{DEFAULT_TEMPLATE, MessageTemplate};
pub use self::timer::Stopwatch;

/// Configuration for one run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub repo_path: PathBuf,
    pub vcs: VcsKind,
    pub dry_run: bool,
    pub limits: BucketLimits,
    pub template: MessageTemplate,
}

/// Outcome of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketReport {
    pub bucket: u32,
    pub files: usize,
    /// False for dry runs and empty buckets.
    pub committed: bool,
    pub elapsed_secs: f64,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub buckets: Vec<BucketReport>,
    pub pushed: bool,
    pub push_elapsed_secs: f64,
    pub total_elapsed_secs: f64,
}

impl RunSummary {
    pub fn total_files(&self) -> usize {
        self.buckets.iter().map(|b| b.files).sum()
    }
}

/// Run the pipeline against the configured repository using the real tool.
pub fn run(config: &RunConfig) -> Result<RunSummary, RunError> {
    let executor = ShellExecutor::new(config.vcs, &config.repo_path);
    run_with(config, &executor)
}

/// Run the pipeline with any executor.
///
/// Steps:
/// 1. Read status and plan buckets
/// 2. Stage and commit every non-empty bucket in ascending order
/// 3. Push once (skipped for dry runs)
pub fn run_with<E: VcsExecutor + ?Sized>(
    config: &RunConfig,
    executor: &E,
) -> Result<RunSummary, RunError> {
    let total_timer = Stopwatch::start();

    let lines = read_status(executor, config.dry_run)?;
    let buckets = plan_with(&lines, config.limits, |file_path| {
        match file_size(&config.repo_path, file_path) {
            Err(e) if config.dry_run => {
                warn!("{}; counting it as empty for the dry run", e);
                Ok(0)
            }
            other => other,
        }
    })?;

    let total = buckets.len();
    info!(
        "Planned {} files into {} bucket(s)",
        buckets.total_files(),
        total
    );

    let mut reports = Vec::with_capacity(total);
    for bucket in &buckets {
        let message = config.template.render(bucket.number, total, bucket.len());
        println!("> {}", message);

        let timer = Stopwatch::start();
        let committed = if bucket.is_empty() {
            println!(" - Nothing to commit");
            false
        } else {
            commit_bucket(executor, config.dry_run, bucket, &message)?;
            !config.dry_run
        };
        let elapsed_secs = timer.elapsed_secs();
        println!(" - Completed in {:.3}s", elapsed_secs);

        reports.push(BucketReport {
            bucket: bucket.number,
            files: bucket.len(),
            committed,
            elapsed_secs,
        });
    }

    let push_timer = Stopwatch::start();
    let pushed = push_changes(executor, config.dry_run)?;
    let push_elapsed_secs = push_timer.elapsed_secs();

    let total_elapsed_secs = total_timer.elapsed_secs();
    println!("Total time: {:.3}s", total_elapsed_secs);

    Ok(RunSummary {
        dry_run: config.dry_run,
        buckets: reports,
        pushed,
        push_elapsed_secs,
        total_elapsed_secs,
    })
}

/// Push every local commit. Returns whether a push was issued.
fn push_changes<E: VcsExecutor + ?Sized>(executor: &E, dry_run: bool) -> Result<bool, VcsError> {
    println!(" - Pushing to default branch");
    if dry_run {
        return Ok(false);
    }
    executor.push()?.into_result()?;
    Ok(true)
}
