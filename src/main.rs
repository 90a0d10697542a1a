use std::{fs, io::Write};

use clap::Parser;
use confnorm::{encoding::normalize, ConfigLoader, LoaderOptions};
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::{cli::CLIArgs, configuration::Configuration, logging::initialize_tracing};

mod cli;
mod configuration;
mod logging;


fn loader_options(cli_args: &CLIArgs, configuration: &Configuration) -> LoaderOptions {
    let mut options = configuration.loader.loader_options();

    if let Some(temp_directory) = cli_args.temp_directory.as_ref() {
        options = options.with_temp_directory(temp_directory);
    }

    if cli_args.keep_temp_artifact {
        options = options.with_keep_temp_artifact(true);
    }

    options
}

fn write_output(cli_args: &CLIArgs, contents: &[u8]) -> Result<()> {
    match cli_args.output_file_path.as_ref() {
        Some(output_file_path) => fs::write(output_file_path, contents)
            .into_diagnostic()
            .wrap_err_with(|| {
                miette!(
                    "Failed to write output file at {}.",
                    output_file_path.display()
                )
            }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents)
                .and_then(|_| stdout.flush())
                .into_diagnostic()
                .wrap_err("Failed to write to standard output.")
        }
    }
}


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load configuration.
    let configuration = match cli_args.configuration_file_path.as_ref() {
        Some(path) => Configuration::load_from_path(path),
        None => Configuration::load_from_default_path_or_defaults(),
    }
    .wrap_err("Failed to load configuration file.")?;


    let logging_raii_guard = initialize_tracing(
        configuration.logging.console_output_level_filter(),
        configuration.logging.log_file_output_level_filter(),
        configuration.logging.log_file_output_directory.as_deref(),
        "confnorm.log",
    )
    .wrap_err("Failed to initialize tracing.")?;

    match configuration.file_path.as_ref() {
        Some(path) => info!("Configuration loaded: {}.", path.display()),
        None => info!("No configuration file found, using defaults."),
    }


    if cli_args.parse {
        let loader = ConfigLoader::new(loader_options(&cli_args, &configuration));

        let loaded = loader
            .load_path(&cli_args.input_file_path)
            .wrap_err_with(|| {
                miette!(
                    "Failed to load {}.",
                    cli_args.input_file_path.display()
                )
            })?;

        if let Some(artifact_path) = loaded.retained_artifact_path() {
            warn!("Staged artifact kept at {}.", artifact_path.display());
        }

        let tree = loaded
            .tree_as_json()
            .wrap_err("Failed to convert the parsed configuration to JSON.")?;

        let mut rendered = serde_json::to_vec_pretty(&tree)
            .into_diagnostic()
            .wrap_err("Failed to serialize the parsed configuration.")?;
        rendered.push(b'\n');

        write_output(&cli_args, &rendered)?;
    } else {
        let raw = fs::read(&cli_args.input_file_path)
            .into_diagnostic()
            .wrap_err_with(|| {
                miette!(
                    "Failed to read input file at {}.",
                    cli_args.input_file_path.display()
                )
            })?;

        let normalized = normalize(&raw).wrap_err_with(|| {
            miette!(
                "Failed to normalize {}.",
                cli_args.input_file_path.display()
            )
        })?;

        info!(
            raw_length = raw.len(),
            normalized_length = normalized.len(),
            "Normalized input to UTF-8."
        );

        write_output(&cli_args, &normalized)?;
    }


    drop(logging_raii_guard);
    Ok(())
}
