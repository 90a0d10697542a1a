//! Staged artifacts: normalized bytes written to a temporary file so they can
//! be handed to a parser that expects a path.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::{Builder, TempPath};
use tracing::{debug, warn};

use crate::error::StagingError;

const STAGED_ARTIFACT_PREFIX: &str = "config-";


/// A normalized configuration on disk.
///
/// Scoped artifacts are removed when this value is dropped. Retained artifacts
/// are left in place for inspection.
#[derive(Debug)]
pub enum StagedArtifact {
    Scoped(TempPath),
    Retained(PathBuf),
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        match self {
            StagedArtifact::Scoped(path) => &**path,
            StagedArtifact::Retained(path) => path.as_path(),
        }
    }

    /// Path of the artifact, if it outlives this value.
    pub fn retained_path(&self) -> Option<&Path> {
        match self {
            StagedArtifact::Scoped(_) => None,
            StagedArtifact::Retained(path) => Some(path.as_path()),
        }
    }
}


/// Writes `normalized` to a new `config-*<.extension>` file in `directory`.
///
/// The extension is only used so that the parser can recognize the format.
/// A partially written artifact is always removed; `keep` only applies to
/// artifacts that were fully written and closed.
pub fn stage_normalized_bytes(
    normalized: &[u8],
    extension: Option<&str>,
    directory: &Path,
    keep: bool,
) -> Result<StagedArtifact, StagingError> {
    let suffix = extension
        .map(|extension| format!(".{extension}"))
        .unwrap_or_default();

    let mut staged_file = Builder::new()
        .prefix(STAGED_ARTIFACT_PREFIX)
        .suffix(&suffix)
        .tempfile_in(directory)
        .map_err(|source| StagingError::Create {
            directory: directory.to_path_buf(),
            source,
        })?;

    debug!(path = %staged_file.path().display(), "Staging normalized configuration.");

    staged_file
        .write_all(normalized)
        .and_then(|_| staged_file.flush())
        .map_err(|source| StagingError::Write {
            path: staged_file.path().to_path_buf(),
            source,
        })?;

    staged_file
        .as_file()
        .sync_all()
        .map_err(|source| StagingError::Close {
            path: staged_file.path().to_path_buf(),
            source,
        })?;

    // Closes the file handle; the path still removes the file on drop.
    let staged_path = staged_file.into_temp_path();

    if !keep {
        return Ok(StagedArtifact::Scoped(staged_path));
    }

    let retained_path = staged_path.keep().map_err(|error| StagingError::Retain {
        path: error.path.to_path_buf(),
        source: error.error,
    })?;

    warn!(
        path = %retained_path.display(),
        "Retaining staged artifact, it will not be cleaned up."
    );

    Ok(StagedArtifact::Retained(retained_path))
}
