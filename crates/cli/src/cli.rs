//! CLI argument parsing with clap derive.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Filter extension corpora from stdin: one extension per line in, kept
/// extensions' paths out.
#[derive(Parser)]
#[command(name = "we-api-finder")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for relative extension paths and metadata paths
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Worker pool ceiling for the api filter
    #[arg(
        long,
        global = true,
        env = "WE_API_FINDER_NUM_THREADS",
        value_name = "N"
    )]
    pub jobs: Option<NonZeroUsize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Keep extensions whose scripts reference any of the given APIs
    Api(ApiArgs),
    /// Keep extensions whose manifest requests any of the given permissions
    Permissions(PermissionsArgs),
    /// Keep extensions whose manifest contains every given dotted key
    Manifest(ManifestArgs),
    /// Keep extensions with at least the given AMO average daily users
    UserCount(UserCountArgs),
}

#[derive(clap::Args)]
pub struct ApiArgs {
    /// Dotted API names, e.g. tabs.create storage.local.get
    #[arg(value_name = "QUERY", required = true)]
    pub queries: Vec<String>,
}

#[derive(clap::Args)]
pub struct PermissionsArgs {
    /// Permission names, e.g. tabs nativeMessaging
    #[arg(value_name = "PERMISSION", required = true)]
    pub permissions: Vec<String>,
}

#[derive(clap::Args)]
pub struct ManifestArgs {
    /// Dotted manifest keys, e.g. background.service_worker
    #[arg(value_name = "KEY", required = true)]
    pub keys: Vec<String>,
}

#[derive(clap::Args)]
pub struct UserCountArgs {
    /// Minimum average daily users
    #[arg(value_name = "MIN")]
    pub min_users: u64,
}

/// Resolve the worker pool ceiling: explicit flag or environment override,
/// else the host's available parallelism, else 1.
pub fn pool_size(jobs: Option<NonZeroUsize>) -> NonZeroUsize {
    jobs.or_else(|| std::thread::available_parallelism().ok())
        .unwrap_or(NonZeroUsize::MIN)
}

/// Truthiness for flag-style environment variables.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
