//! Command-line interface definitions for the binary.

use std::path::PathBuf;

use clap::Parser;



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "confnorm",
    author,
    about = "Normalizes a configuration file of any encoding to UTF-8.",
    version
)]
pub struct CLIArgs {
    /// The configuration file to normalize.
    #[arg(help = "Configuration file to normalize (any encoding).")]
    pub input_file_path: PathBuf,

    /// This is the path to this tool's own settings file.
    /// If unspecified, this defaults to `./data/configuration.toml` if it exists.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the settings file to use. Defaults to ./data/configuration.toml, \
                or built-in defaults if that file does not exist."
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output-file-path",
        help = "Where to write the normalized UTF-8 output. Defaults to standard output."
    )]
    pub output_file_path: Option<PathBuf>,

    #[arg(
        long = "parse",
        help = "If this flag is present, the input is loaded through the structured-config \
                parser (format chosen by extension) and printed as JSON."
    )]
    pub parse: bool,

    #[arg(
        long = "temp-directory",
        help = "Directory for staged artifacts. Overrides the settings file."
    )]
    pub temp_directory: Option<PathBuf>,

    #[arg(
        long = "keep-temp-artifact",
        help = "Leave the staged artifact on disk after parsing. Overrides the settings file."
    )]
    pub keep_temp_artifact: bool,
}
