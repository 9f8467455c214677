//! incpush - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use incpush::bucket::{BucketLimits, DEFAULT_MAX_FILES, SizeAccounting};
use incpush::push::{DEFAULT_TEMPLATE, MessageTemplate, RunConfig, run};
use incpush::vcs::{VcsKind, check_vcs_installed};

/// Add, commit and push a large change set in size-bounded buckets.
#[derive(Parser, Debug)]
#[command(name = "incpush")]
#[command(about = "Incremental push helper: commit pending changes in buckets, then push once")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Path to the repository clone
    #[arg(short = 'p', long)]
    path: PathBuf,

    /// Maximum size in MB a bucket can hold
    #[arg(short = 's', long = "max-size", default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
    max_size: u64,

    /// Maximum number of files a bucket can hold
    #[arg(short = 'f', long = "max-files", default_value_t = DEFAULT_MAX_FILES, value_parser = parse_max_files)]
    max_files: usize,

    /// Commit message template. Use {bucket}, {total} and {files} for extra information
    #[arg(short = 'm', long = "msg", default_value = DEFAULT_TEMPLATE)]
    msg: MessageTemplate,

    /// Dry run - print the planned buckets without adding, committing or pushing
    #[arg(short = 'd', long = "dry")]
    dry_run: bool,

    /// Version-control tool to drive
    #[arg(long, value_enum, default_value_t = VcsKind::Hg)]
    vcs: VcsKind,

    /// Count each file's size before checking the bucket size limit
    #[arg(long)]
    inclusive_size: bool,

    /// Print a JSON summary of the run on stdout
    #[arg(long)]
    json: bool,

    /// Show debug logging
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn parse_max_files(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    check_vcs_installed(cli.vcs).context("A version-control tool is required")?;

    let config = RunConfig {
        repo_path: cli.path,
        vcs: cli.vcs,
        dry_run: cli.dry_run,
        limits: BucketLimits {
            max_files: cli.max_files,
            max_size_mb: cli.max_size as f64,
            accounting: if cli.inclusive_size {
                SizeAccounting::Inclusive
            } else {
                SizeAccounting::Lagged
            },
        },
        template: cli.msg,
    };

    let summary = run(&config).with_context(|| {
        format!(
            "Incremental push in {} failed",
            config.repo_path.display()
        )
    })?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    }

    Ok(())
}
