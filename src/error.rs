//! Error types for every stage of a configuration load.
//!
//! [`LoadError`] is what callers of [`ConfigLoader`][crate::ConfigLoader] see.
//! Each of its variants wraps the more specific error of the stage that failed,
//! so the original cause is always reachable through [`std::error::Error::source`].

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::parser::ConfigFormat;


/// The transcoder could not turn non-UTF-8 input into UTF-8.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum EncodingConversionError {
    /// The best charset candidate did not decode into plausible plain text.
    #[error("no charset could be confidently guessed (best candidate was {candidate})")]
    #[diagnostic(
        code(confnorm::encoding::unrecognized_charset),
        help("the input does not look like text in any supported encoding; is it a binary file?")
    )]
    UnrecognizedCharset { candidate: &'static str },

    /// The guessed decoder hit a malformed byte sequence.
    #[error("input is not well-formed {encoding}")]
    #[diagnostic(code(confnorm::encoding::malformed_input))]
    MalformedInput { encoding: &'static str },
}


/// Context for a failed [`normalize`][crate::encoding::normalize] call.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The input carried a UTF-16 byte-order mark but its body is not valid UTF-16.
    #[error("input does not match its byte-order mark")]
    #[diagnostic(
        code(confnorm::normalize::decode),
        help("the file starts with a UTF-16 byte-order mark; was it truncated or re-encoded?")
    )]
    Decode {
        #[source]
        source: EncodingConversionError,
    },

    #[error("transcoding stage failed")]
    #[diagnostic(code(confnorm::normalize::transcode))]
    Transcode {
        #[source]
        source: EncodingConversionError,
    },
}

impl NormalizeError {
    /// The underlying conversion error.
    pub fn conversion_error(&self) -> &EncodingConversionError {
        match self {
            NormalizeError::Decode { source } | NormalizeError::Transcode { source } => source,
        }
    }
}


/// The staged artifact could not be created, written or closed.
#[derive(Error, Diagnostic, Debug)]
pub enum StagingError {
    #[error("could not create staged artifact in {}", .directory.display())]
    #[diagnostic(
        code(confnorm::staging::create),
        help("check that the temporary directory exists and is writable")
    )]
    Create {
        directory: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write staged artifact {}", .path.display())]
    #[diagnostic(code(confnorm::staging::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not close staged artifact {}", .path.display())]
    #[diagnostic(code(confnorm::staging::close))]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not retain staged artifact {}", .path.display())]
    #[diagnostic(code(confnorm::staging::retain))]
    Retain {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}


/// Error produced by one of the format libraries backing the parser.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Ini(#[from] ini::ParseError),
}


/// The structured-config parser rejected the staged content.
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("unsupported configuration format (extension: {extension:?})")]
    #[diagnostic(
        code(confnorm::parse::unsupported_format),
        help("supported extensions are .toml, .yaml, .yml, .json and .ini")
    )]
    UnsupportedFormat { extension: Option<String> },

    #[error("could not read staged artifact {}", .path.display())]
    #[diagnostic(code(confnorm::parse::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid {format} syntax in {}", .path.display())]
    #[diagnostic(code(confnorm::parse::syntax))]
    Syntax {
        format: ConfigFormat,
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}


/// The parsed tree could not be mapped onto the requested structure.
#[derive(Error, Diagnostic, Debug)]
#[error("could not bind {format} configuration onto {target}")]
#[diagnostic(
    code(confnorm::bind),
    help("check that field names and value types match the target structure")
)]
pub struct BindError {
    pub format: ConfigFormat,
    pub target: &'static str,
    #[source]
    pub source: FormatError,
}


/// A failed configuration load. Exactly one kind is reported per failure.
#[derive(Error, Diagnostic, Debug)]
pub enum LoadError {
    #[error("could not read configuration source {origin}")]
    #[diagnostic(code(confnorm::load::read))]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("encoding conversion failed for {origin}")]
    #[diagnostic(code(confnorm::load::encoding))]
    EncodingConversion {
        origin: String,
        #[source]
        source: NormalizeError,
    },

    #[error("could not stage normalized configuration")]
    #[diagnostic(code(confnorm::load::staging))]
    Staging(#[from] StagingError),

    #[error("configuration could not be parsed")]
    #[diagnostic(code(confnorm::load::parse))]
    Parse(#[from] ParseError),

    #[error("configuration could not be bound")]
    #[diagnostic(code(confnorm::load::bind))]
    Bind(#[from] BindError),
}
