//! The structured-config parser the normalized bytes are handed to.
//!
//! Parsing is a collaborator of the loader rather than part of it: anything
//! implementing [`ConfigParser`] can be plugged into a
//! [`ConfigLoader`][crate::ConfigLoader]. The default, [`FileFormatParser`],
//! picks TOML, YAML, JSON or INI by file extension.

use std::{
    any::type_name,
    fmt::{self, Display, Formatter},
    fs,
    path::Path,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::error::{BindError, FormatError, ParseError};


/// A configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
    Ini,
}

impl ConfigFormat {
    /// Matches an extension (without the leading dot), ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            "ini" => Some(ConfigFormat::Ini),
            _ => None,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }
}

impl Display for ConfigFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
            ConfigFormat::Ini => "INI",
        };

        f.write_str(name)
    }
}


/// A parsed key/value tree, ready to be bound onto a typed structure.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedConfig {
    Toml(toml::Table),
    Yaml(serde_yaml::Value),
    Json(JsonValue),
    /// Keys of the general section at the top level, every named section
    /// as a nested object. See [`FileFormatParser`] for how values are typed.
    Ini(Map<String, JsonValue>),
}

impl ParsedConfig {
    pub fn format(&self) -> ConfigFormat {
        match self {
            ParsedConfig::Toml(_) => ConfigFormat::Toml,
            ParsedConfig::Yaml(_) => ConfigFormat::Yaml,
            ParsedConfig::Json(_) => ConfigFormat::Json,
            ParsedConfig::Ini(_) => ConfigFormat::Ini,
        }
    }

    /// Maps the tree onto `T` by matching keys to field names.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        let bound = match self {
            ParsedConfig::Toml(table) => toml::Value::Table(table.clone())
                .try_into::<T>()
                .map_err(FormatError::from),
            ParsedConfig::Yaml(value) => {
                serde_yaml::from_value::<T>(value.clone()).map_err(FormatError::from)
            }
            ParsedConfig::Json(value) => {
                serde_json::from_value::<T>(value.clone()).map_err(FormatError::from)
            }
            ParsedConfig::Ini(sections) => {
                serde_json::from_value::<T>(JsonValue::Object(sections.clone()))
                    .map_err(FormatError::from)
            }
        };

        bound.map_err(|source| BindError {
            format: self.format(),
            target: type_name::<T>(),
            source,
        })
    }

    /// The tree as JSON, regardless of its source format.
    ///
    /// TOML dates and times become their RFC 3339 strings.
    pub fn to_json(&self) -> Result<JsonValue, BindError> {
        match self {
            ParsedConfig::Toml(table) => Ok(toml_table_to_json(table)),
            ParsedConfig::Json(value) => Ok(value.clone()),
            ParsedConfig::Ini(sections) => Ok(JsonValue::Object(sections.clone())),
            ParsedConfig::Yaml(_) => self.bind(),
        }
    }
}


fn toml_table_to_json(table: &toml::Table) -> JsonValue {
    JsonValue::Object(
        table
            .iter()
            .map(|(key, value)| (key.clone(), toml_to_json(value)))
            .collect(),
    )
}

fn toml_to_json(value: &toml::Value) -> JsonValue {
    match value {
        toml::Value::String(string) => JsonValue::String(string.clone()),
        toml::Value::Integer(integer) => JsonValue::from(*integer),
        // Non-finite floats have no JSON form and become null.
        toml::Value::Float(float) => JsonValue::from(*float),
        toml::Value::Boolean(boolean) => JsonValue::Bool(*boolean),
        toml::Value::Datetime(datetime) => JsonValue::String(datetime.to_string()),
        toml::Value::Array(array) => JsonValue::Array(array.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => toml_table_to_json(table),
    }
}


/// Parses a configuration file into a [`ParsedConfig`].
pub trait ConfigParser {
    fn parse_file(&self, path: &Path) -> Result<ParsedConfig, ParseError>;
}


/// Default [`ConfigParser`], choosing the format from the file extension.
///
/// INI has no value types of its own: `true` and `false` become booleans,
/// values that parse as a 64-bit integer become integers and everything
/// else stays a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFormatParser;

impl ConfigParser for FileFormatParser {
    fn parse_file(&self, path: &Path) -> Result<ParsedConfig, ParseError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ParseError::UnsupportedFormat {
            extension: path
                .extension()
                .map(|extension| extension.to_string_lossy().into_owned()),
        })?;

        let contents = fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match format {
            ConfigFormat::Toml => toml::from_str::<toml::Table>(&contents)
                .map(ParsedConfig::Toml)
                .map_err(FormatError::from),
            ConfigFormat::Yaml => serde_yaml::from_str::<serde_yaml::Value>(&contents)
                .map(ParsedConfig::Yaml)
                .map_err(FormatError::from),
            ConfigFormat::Json => serde_json::from_str::<JsonValue>(&contents)
                .map(ParsedConfig::Json)
                .map_err(FormatError::from),
            ConfigFormat::Ini => ini::Ini::load_from_str(&contents)
                .map(|document| ParsedConfig::Ini(ini_tree(&document)))
                .map_err(FormatError::from),
        };

        parsed.map_err(|source| ParseError::Syntax {
            format,
            path: path.to_path_buf(),
            source,
        })
    }
}


fn ini_tree(document: &ini::Ini) -> Map<String, JsonValue> {
    let mut tree = Map::new();

    for (section, properties) in document.iter() {
        let values = properties
            .iter()
            .map(|(key, value)| (key.to_string(), ini_scalar(value)));

        match section {
            None => tree.extend(values),
            Some(section) => {
                let entry = tree
                    .entry(section.to_string())
                    .or_insert_with(|| JsonValue::Object(Map::new()));

                // A key already taken by a general-section value is replaced by the section.
                match entry {
                    JsonValue::Object(table) => table.extend(values),
                    other => *other = JsonValue::Object(values.collect()),
                }
            }
        }
    }

    tree
}

fn ini_scalar(value: &str) -> JsonValue {
    if let Ok(boolean) = value.parse::<bool>() {
        return JsonValue::Bool(boolean);
    }

    match value.parse::<i64>() {
        Ok(integer) => JsonValue::from(integer),
        Err(_) => JsonValue::String(value.to_string()),
    }
}
