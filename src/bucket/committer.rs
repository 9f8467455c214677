//! Stage one bucket in sub-batches and commit it.

use tracing::debug;

use crate::error::VcsError;
use crate::vcs::executor::VcsExecutor;

use super::planner::Bucket;

/// Maximum number of paths passed to a single `add` invocation.
pub const SUB_BATCH_SIZE: usize = 10;

/// Deal `paths` round-robin into `ceil(len / SUB_BATCH_SIZE)` sub-batches.
///
/// Sub-batch `k` receives the paths at positions `k`, `k + count`,
/// `k + 2 * count` and so on, so each holds at most `SUB_BATCH_SIZE` paths,
/// none is empty, and relative order is kept within a sub-batch.
pub fn split_interleaved(paths: &[String]) -> Vec<Vec<String>> {
    let count = paths.len().div_ceil(SUB_BATCH_SIZE);
    (0..count)
        .map(|k| paths.iter().skip(k).step_by(count).cloned().collect())
        .collect()
}

/// Stage the bucket's files and create one commit with `message`.
///
/// In dry-run mode nothing is executed; each sub-batch is printed instead.
/// The first failing `add` aborts before the commit is attempted.
pub fn commit_bucket<E: VcsExecutor + ?Sized>(
    executor: &E,
    dry_run: bool,
    bucket: &Bucket,
    message: &str,
) -> Result<(), VcsError> {
    println!(" - Adding {}", bucket.len());
    for batch in split_interleaved(&bucket.file_paths) {
        if dry_run {
            println!("  > {:?}", batch);
        } else {
            debug!("Staging {} files for bucket {}", batch.len(), bucket.number);
            executor.add(&batch)?.into_result()?;
        }
    }

    println!(" - Commiting");
    if !dry_run {
        executor.commit(message)?.into_result()?;
    }

    Ok(())
}
