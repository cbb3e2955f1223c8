//! Reading the source text file.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Errors that can occur while reading the input file.
#[derive(Debug, Error)]
pub enum FileReadError {
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Not a regular file: {}", .path.display())]
    NotAFile { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileReadError {
    /// Returns the path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::NotAFile { path } | Self::Io { path, .. } => path,
        }
    }
}

/// Reads the whole file at `path` as UTF-8 text.
///
/// # Errors
///
/// Fails if the path does not exist, is not a regular file, or cannot be
/// read as UTF-8.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String, FileReadError> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FileReadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FileReadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_file() {
        return Err(FileReadError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| FileReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Read {} characters from {}",
        text.chars().count(),
        path.display()
    );
    Ok(text)
}
