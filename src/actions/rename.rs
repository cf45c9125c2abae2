//! File renaming within the same directory.
//!
//! # Overview
//!
//! Renames one duplicate file to an operator-supplied name. The new name
//! is a bare file name, not a path: the destination is always the file's
//! own parent directory. Name validation failures and destination
//! collisions are recoverable (the resolver reprompts); an I/O failure
//! during the rename itself is terminal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for rename operations.
///
/// [`RenameError::is_recoverable`] tells the resolver whether the error
/// loops back to the action prompt or ends the file with a failed
/// outcome.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The supplied name was empty or whitespace-only.
    #[error("invalid new name: empty or whitespace-only")]
    EmptyName,

    /// The supplied name contains a path separator; only bare file names
    /// are accepted.
    #[error("invalid new name '{0}': must not contain path separators")]
    NotAFileName(String),

    /// A file with the requested name already exists in the directory.
    #[error("a file named '{0}' already exists in this directory")]
    DestinationExists(String),

    /// The source path has no parent directory to rename within.
    #[error("no parent directory for {0}")]
    NoParent(PathBuf),

    /// General I/O error during the rename itself.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenameError {
    /// Whether the resolver should reprompt rather than record a failed
    /// outcome.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyName | Self::NotAFileName(_) | Self::DestinationExists(_)
        )
    }
}

/// Rename a file to a new name inside its own parent directory.
///
/// The name is trimmed before validation. On success the destination
/// path is returned; the move is a single atomic `fs::rename`.
///
/// # Errors
///
/// - [`RenameError::EmptyName`] / [`RenameError::NotAFileName`] for
///   invalid names (recoverable)
/// - [`RenameError::DestinationExists`] when the target name is taken
///   (recoverable; neither file is touched)
/// - [`RenameError::NoParent`] / [`RenameError::Io`] for terminal
///   failures
pub fn rename_file(path: &Path, new_name: &str) -> Result<PathBuf, RenameError> {
    let name = new_name.trim();
    if name.is_empty() {
        return Err(RenameError::EmptyName);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(RenameError::NotAFileName(name.to_string()));
    }

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| RenameError::NoParent(path.to_path_buf()))?;

    let destination = parent.join(name);
    if destination.exists() {
        return Err(RenameError::DestinationExists(name.to_string()));
    }

    fs::rename(path, &destination).map_err(|e| RenameError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Renamed {} -> {}", path.display(), destination.display());
    Ok(destination)
}
