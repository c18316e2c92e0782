//src/error.rs

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A type alias for `Result<T, HubError>`.
pub type Result<T> = std::result::Result<T, HubError>;

/// Everything that can abort a hub build. All failures are fatal; the
/// pipeline has no retries and no partial-completion recovery.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    #[error("unrecognized assembly accession '{0}'")]
    BadAccession(String),

    #[error("{}:{line}: malformed repeat record: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("assembly report {} is missing the '{field}' field", .path.display())]
    MissingMetadata { path: PathBuf, field: &'static str },

    #[error("chromosome size file {} contains no sequences", .0.display())]
    EmptyChromSizes(PathBuf),

    #[error("genome {0} is already registered in genomes.txt")]
    DuplicateRegistration(String),

    #[error("genome directory {} already exists", .0.display())]
    GenomeExists(PathBuf),

    #[error("{tool} exited with status {status}")]
    Tool {
        tool: &'static str,
        status: ExitStatus,
    },
}
