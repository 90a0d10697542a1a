use std::{
    env::current_dir,
    path::{Path, PathBuf},
};

use miette::{miette, Context, IntoDiagnostic, Result};


/// Returns the default settings file path, which is
/// `{current directory}/data/configuration.toml`. The file may not exist.
pub fn get_default_configuration_file_path() -> Result<PathBuf> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.toml");

    Ok(configuration_filepath)
}

/// Anchors a relative `path` at `base_directory`; absolute paths are returned as-is.
#[must_use = "function returns the resolved path"]
pub fn resolve_relative_path<S>(base_directory: &Path, path: S) -> PathBuf
where
    S: Into<PathBuf>,
{
    let path: PathBuf = path.into();

    if path.is_absolute() {
        path
    } else {
        base_directory.join(path)
    }
}
