use std::num::ParseFloatError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{what} not found at {path:?}")]
    MissingPath { what: &'static str, path: PathBuf },

    #[error("no .{extension} files found in {dir:?}")]
    NoInputFiles { dir: PathBuf, extension: String },

    #[error("line {line}: invalid OFFSET value {token:?}: {source}")]
    Format {
        line: usize,
        token: String,
        source: ParseFloatError,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace {path:?}: {source}")]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },

    #[error("{path:?} failed verification: {mismatches} offset mismatches")]
    Verification { path: PathBuf, mismatches: usize },

    #[error("failed to scan directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid config {path:?}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach `path` to an I/O error.
pub(crate) fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}
