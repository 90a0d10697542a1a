use std::path::PathBuf;

use confnorm::LoaderOptions;
use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;

use crate::configuration::{
    traits::ResolvableConfigurationWithContext,
    utilities::resolve_relative_path,
};


#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub(super) struct UnresolvedLoaderConfiguration {
    temp_directory: Option<String>,

    keep_temp_artifact: bool,
}

#[derive(Clone, Debug)]
pub struct LoaderConfiguration {
    /// Where staged artifacts are written; `None` means the system temporary directory.
    pub temp_directory: Option<PathBuf>,

    pub keep_temp_artifact: bool,
}

impl ResolvableConfigurationWithContext for UnresolvedLoaderConfiguration {
    type Resolved = LoaderConfiguration;
    type Context = PathBuf;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let temp_directory = match self.temp_directory {
            Some(temp_directory) => {
                let temp_directory = resolve_relative_path(&context, temp_directory);

                if !temp_directory.is_dir() {
                    return Err(miette!(
                        "Temporary directory {} does not exist or is not a directory!",
                        temp_directory.display()
                    ));
                }

                let temp_directory = dunce::canonicalize(temp_directory)
                    .into_diagnostic()
                    .wrap_err("Failed to canonicalize temporary directory path.")?;

                Some(temp_directory)
            }
            None => None,
        };


        Ok(Self::Resolved {
            temp_directory,
            keep_temp_artifact: self.keep_temp_artifact,
        })
    }
}

impl LoaderConfiguration {
    /// Options for a [`ConfigLoader`][confnorm::ConfigLoader] built from this table.
    pub fn loader_options(&self) -> LoaderOptions {
        let options = LoaderOptions::default().with_keep_temp_artifact(self.keep_temp_artifact);

        match &self.temp_directory {
            Some(temp_directory) => options.with_temp_directory(temp_directory),
            None => options,
        }
    }
}
