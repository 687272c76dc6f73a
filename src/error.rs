use std::path::{Path, PathBuf};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The two fatal outcomes of a cleaning run. Unparseable dates and
/// durations are not errors; they become nulls.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl CleanError {
    pub fn load(path: &Path, source: impl Into<BoxError>) -> Self {
        CleanError::Load {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn write(path: &Path, source: impl Into<BoxError>) -> Self {
        CleanError::Write {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

pub type CleanResult<T> = Result<T, CleanError>;
