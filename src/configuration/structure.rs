use std::path::{Path, PathBuf};

use confnorm::ConfigLoader;
use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;

pub use self::loader::LoaderConfiguration;
use self::loader::UnresolvedLoaderConfiguration;
pub use self::logging::LoggingConfiguration;
use self::logging::UnresolvedLoggingConfiguration;
use super::traits::ResolvableConfigurationWithContext;
use super::utilities::get_default_configuration_file_path;

mod loader;
mod logging;



#[derive(Deserialize, Debug, Default)]
pub(crate) struct UnresolvedConfiguration {
    /// Configuration loader options.
    #[serde(default)]
    loader: UnresolvedLoaderConfiguration,

    /// Logging-related configuration.
    #[serde(default)]
    logging: UnresolvedLoggingConfiguration,
}


/// The entire configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// This is the file path this `Configuration` instance was loaded from,
    /// or `None` if the built-in defaults are in use.
    pub file_path: Option<PathBuf>,

    /// Configuration loader options.
    pub loader: LoaderConfiguration,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,
}


/// Context for resolving the whole configuration.
pub(crate) struct ConfigurationContext {
    /// Canonical path of the settings file, if there is one.
    file_path: Option<PathBuf>,

    /// Directory relative paths are anchored to.
    base_directory: PathBuf,
}


impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = ConfigurationContext;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let loader = self
            .loader
            .resolve(context.base_directory.clone())
            .wrap_err("Failed to resolve loader table.")?;

        let logging = self
            .logging
            .resolve(context.base_directory)
            .wrap_err("Failed to resolve logging table.")?;


        Ok(Configuration {
            file_path: context.file_path,
            loader,
            logging,
        })
    }
}


impl Configuration {
    /// Load the configuration from a specific file path.
    pub fn load_from_path<S: AsRef<Path>>(configuration_file_path: S) -> Result<Self> {
        let configuration_file_path = dunce::canonicalize(configuration_file_path.as_ref())
            .into_diagnostic()
            .wrap_err_with(|| {
                miette!(
                    "Could not canonicalize configuration file path {}.",
                    configuration_file_path.as_ref().display()
                )
            })?;

        // Read and normalize the configuration file, then parse it into
        // the `UnresolvedConfiguration` structure and resolve it.
        let unresolved_configuration = ConfigLoader::default()
            .load_path(&configuration_file_path)
            .wrap_err("Could not load configuration file!")?
            .unmarshal::<UnresolvedConfiguration>()
            .wrap_err("Configuration file has an unexpected structure!")?;


        let base_directory = configuration_file_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| miette!("Configuration file path has no parent directory."))?;

        let resolved_configuration = unresolved_configuration
            .resolve(ConfigurationContext {
                file_path: Some(configuration_file_path),
                base_directory,
            })
            .wrap_err("Failed to resolve configuration.")?;

        Ok(resolved_configuration)
    }

    /// Load the configuration from the default path (`./data/configuration.toml`),
    /// falling back to built-in defaults if that file does not exist.
    pub fn load_from_default_path_or_defaults() -> Result<Configuration> {
        let default_path = get_default_configuration_file_path()
            .wrap_err("Could not determine the default configuration file path.")?;

        if default_path.is_file() {
            return Configuration::load_from_path(default_path);
        }

        Configuration::defaults()
    }

    /// The built-in defaults, resolved against the current directory.
    pub fn defaults() -> Result<Configuration> {
        let base_directory = std::env::current_dir()
            .into_diagnostic()
            .wrap_err("Could not get the current directory.")?;

        UnresolvedConfiguration::default()
            .resolve(ConfigurationContext {
                file_path: None,
                base_directory,
            })
            .wrap_err("Failed to resolve default configuration.")
    }
}
