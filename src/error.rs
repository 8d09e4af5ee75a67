//! Error types for the live reload server

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for livewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or starting the server.
///
/// Everything that can go wrong once the watch loop is running is handled
/// locally (skipped entries, evicted subscribers) and never surfaces here.
#[derive(Debug, Error)]
pub enum Error {
    /// A user-supplied include/exclude pattern is not a valid regex
    #[error("invalid filter pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The watch root does not exist or cannot be resolved
    #[error("cannot use `{}` as root directory: {source}", .path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to bind the HTTP listener
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
