use std::path::PathBuf;
use std::process::ExitStatus;

/// Resource-level failures. Per-record problems never surface here: a bad line or
/// entry is skipped by the extractors instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed benchmark dump: {0}")]
    MalformedDump(#[source] serde_json::Error),

    #[error("benchmark executable not found at {} (build the project first)", .path.display())]
    ExecutableNotFound { path: PathBuf },

    #[error("benchmark run failed ({status}): {stderr}")]
    BenchmarkFailed { status: ExitStatus, stderr: String },

    #[error("hardware detection failed: {reason}")]
    HardwareDetection { reason: String },

    #[error(
        "unable to detect hardware key automatically; pass --hardware-key or explicit --native-best/--portable-best paths"
    )]
    HardwareKeyUnresolved,

    #[error("no benchmark data could be loaded from the best run files")]
    NoBestRuns,

    #[error("no benchmark data found")]
    NoRecords,

    #[error("failed to serialize report: {0}")]
    Report(#[source] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
