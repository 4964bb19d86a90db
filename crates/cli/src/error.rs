use std::path::PathBuf;

/// we-api-finder error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A query was added after the worker pool snapshotted the query set.
    #[error("queries are frozen: a pooled matcher has already been created")]
    QueriesFrozen,

    /// Results were requested before a pooled find_matches resolved.
    #[error("attempted to get results before find_matches resolved")]
    ResultsNotReady,

    /// A worker died before delivering its reply.
    #[error("worker lost before completing its task")]
    WorkerLost,

    /// Pattern compilation error (not reachable for engine-built patterns,
    /// which escape query parts before composing).
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input line that resolved to no extension directory.
    #[error("no extension found for input line: {line}")]
    UnknownAddon { line: String },

    /// Unparsable or missing manifest.json.
    #[error("manifest error: {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// AMO metadata could not be loaded. Carries a remediation hint.
    #[error("metadata error: {message}\n{hint}")]
    Metadata { message: String, hint: String },

    /// Invalid command-line arguments
    #[error("argument error: {0}")]
    Argument(String),
}

/// Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes per the CLI contract: 0 on clean completion, 1 on any
/// fatal startup or engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Batch ran to completion (even if every line was filtered out).
    Success = 0,
    /// Fatal error: unknown filter, malformed arguments, missing metadata.
    Fatal = 1,
}

impl From<&Error> for ExitCode {
    fn from(_: &Error) -> Self {
        // Per-line failures never surface here; anything that reaches the
        // top level is fatal for the batch.
        ExitCode::Fatal
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
