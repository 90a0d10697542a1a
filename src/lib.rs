//! Loads configuration files of arbitrary encoding.
//!
//! Raw bytes are normalized to canonical UTF-8 (no byte-order mark, legacy
//! encodings transcoded) before a structured-config parser ever sees them.
//! The parser then maps its key/value tree onto a caller-supplied structure.
//!
//! Your starting point should probably be [`ConfigLoader::load_path`]:
//!
//! ```no_run
//! use confnorm::{ConfigLoader, LoaderOptions};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Service {
//!     name: String,
//! }
//!
//! # fn main() -> Result<(), confnorm::LoadError> {
//! let loader = ConfigLoader::new(LoaderOptions::default());
//! let service: Service = loader.load_into("service.toml")?;
//! println!("{}", service.name);
//! # Ok(())
//! # }
//! ```
//!
//! If all you need is the UTF-8 text, use [`encoding::normalize`].

pub mod encoding;
pub mod error;
pub mod loader;
pub mod parser;
pub mod staging;

pub use encoding::normalize;
pub use error::{
    BindError,
    EncodingConversionError,
    LoadError,
    NormalizeError,
    ParseError,
    StagingError,
};
pub use loader::{ConfigLoader, LoadedConfiguration, LoaderOptions};
pub use parser::{ConfigFormat, ConfigParser, FileFormatParser, ParsedConfig};
