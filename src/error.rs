//! Error types shared by every tool.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, extracting or moving files.
#[derive(Error, Debug)]
pub enum Error {
    #[error("URL must use one of: {allowed}\n  got: {url}")]
    InvalidUrl { url: String, allowed: String },

    #[error("cannot determine a filename from URL: {0}")]
    NoFilename(String),

    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("cannot determine repository name from: {0}")]
    NoRepoName(String),

    #[error("download failed: HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("download failed: {0}")]
    Download(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Archive(String),

    #[error("{tool} not found on PATH (needed for .{format} archives)")]
    ToolNotFound { tool: &'static str, format: &'static str },

    #[error("{tool} failed with exit code: {code:?}")]
    ToolFailed { tool: &'static str, code: Option<i32> },

    #[error("archive contained no files")]
    EmptyArchive,

    #[error("target directory does not exist: {}", .0.display())]
    MissingTarget(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attach context to `std::io::Result` values.
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Error::io(f(), e))
    }
}
