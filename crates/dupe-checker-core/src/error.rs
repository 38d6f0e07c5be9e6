use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Number of aliases ({aliases}) must be equal to number of folders ({folders})")]
    AliasCountMismatch { aliases: usize, folders: usize },

    #[error("Error fingerprinting {}: {source}", path.display())]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error relocating {}: {source}", path.display())]
    Relocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report error: {0}")]
    Report(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    /// True for errors raised before any file was read or moved.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NotADirectory(_) | Error::AliasCountMismatch { .. }
        )
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Report(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Report(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
