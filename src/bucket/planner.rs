//! Partition pending changes into count- and size-bounded buckets.

use std::path::Path;

use tracing::debug;

use crate::error::PlanError;
use crate::vcs::status::parse_status;

/// Bytes per megabyte used for bucket size accounting.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Default cumulative size threshold per bucket, in megabytes.
pub const DEFAULT_MAX_SIZE_MB: f64 = 200.0;

/// Default file count per bucket. Large enough to be effectively unbounded.
pub const DEFAULT_MAX_FILES: usize = 2_000_000;

/// When a file's size counts towards the size threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeAccounting {
    /// The size is added after the threshold check, so size overflow is
    /// detected one file late.
    #[default]
    Lagged,
    /// The size is added before the check, like the file count.
    Inclusive,
}

/// Thresholds that close a bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketLimits {
    pub max_files: usize,
    pub max_size_mb: f64,
    pub accounting: SizeAccounting,
}

impl Default for BucketLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            accounting: SizeAccounting::default(),
        }
    }
}

/// Ordered file paths destined for one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// 1-based position in the plan.
    pub number: u32,
    /// Paths in status-output order.
    pub file_paths: Vec<String>,
}

impl Bucket {
    fn new(number: u32) -> Self {
        Self {
            number,
            file_paths: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.file_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_paths.is_empty()
    }
}

/// Buckets numbered contiguously from 1, in ascending order.
///
/// Always holds at least bucket 1, which is empty when there was nothing
/// to plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSet {
    buckets: Vec<Bucket>,
}

impl BucketSet {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when no bucket holds any file.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Bucket::is_empty)
    }

    pub fn get(&self, number: u32) -> Option<&Bucket> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.buckets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    pub fn total_files(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }
}

impl<'a> IntoIterator for &'a BucketSet {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Plan buckets for status lines, reading file sizes below `repo_path`.
pub fn plan<S: AsRef<str>>(
    repo_path: &Path,
    status_lines: &[S],
    limits: BucketLimits,
) -> Result<BucketSet, PlanError> {
    plan_with(status_lines, limits, |file_path| file_size(repo_path, file_path))
}

/// Size in bytes of a repository-relative path.
pub fn file_size(repo_path: &Path, file_path: &str) -> Result<u64, PlanError> {
    let path = repo_path.join(file_path);
    std::fs::metadata(&path)
        .map(|meta| meta.len())
        .map_err(|source| PlanError::FileAccess { path, source })
}

/// Plan buckets using `size_of` to look up each file's size in bytes.
///
/// Walks the actionable lines in order, appending each path to the current
/// bucket. After the append the bucket is closed when its file count reaches
/// `max_files` or the running size counter reaches `max_size_mb`; closing
/// resets the counter. Under [`SizeAccounting::Lagged`] the appended file's
/// size joins the counter only after that check, so after a count-triggered
/// close the counter starts at the size of the file that closed the bucket.
pub fn plan_with<S, F>(
    status_lines: &[S],
    limits: BucketLimits,
    mut size_of: F,
) -> Result<BucketSet, PlanError>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Result<u64, PlanError>,
{
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut current: u32 = 1;
    let mut size_counter = 0.0_f64;

    for record in parse_status(status_lines) {
        if buckets.len() < current as usize {
            buckets.push(Bucket::new(current));
        }

        let size_mb = size_of(&record.file_path)? as f64 / BYTES_PER_MB;
        let bucket = &mut buckets[current as usize - 1];
        bucket.file_paths.push(record.file_path);

        if limits.accounting == SizeAccounting::Inclusive {
            size_counter += size_mb;
        }

        if bucket.len() >= limits.max_files || size_counter >= limits.max_size_mb {
            debug!(
                "Closing bucket {} with {} files ({:.2} MB counted)",
                current,
                bucket.len(),
                size_counter
            );
            current += 1;
            size_counter = 0.0;
        }

        if limits.accounting == SizeAccounting::Lagged {
            size_counter += size_mb;
        }
    }

    if buckets.is_empty() {
        buckets.push(Bucket::new(1));
    }

    Ok(BucketSet { buckets })
}
