use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    encoding::{normalize_with, SniffingTranscoder, Transcoder},
    error::{BindError, LoadError},
    parser::{ConfigFormat, ConfigParser, FileFormatParser, ParsedConfig},
    staging::stage_normalized_bytes,
};


/// Options for a [`ConfigLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Where staged artifacts are written. Defaults to the system temporary directory.
    pub temp_directory: PathBuf,

    /// Leave the staged artifact on disk after loading, for debugging.
    pub keep_temp_artifact: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            temp_directory: std::env::temp_dir(),
            keep_temp_artifact: false,
        }
    }
}

impl LoaderOptions {
    pub fn with_temp_directory<P: Into<PathBuf>>(mut self, temp_directory: P) -> Self {
        self.temp_directory = temp_directory.into();
        self
    }

    pub fn with_keep_temp_artifact(mut self, keep_temp_artifact: bool) -> Self {
        self.keep_temp_artifact = keep_temp_artifact;
        self
    }
}


/// The outcome of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedConfiguration {
    parsed: ParsedConfig,
    retained_artifact_path: Option<PathBuf>,
}

impl LoadedConfiguration {
    pub fn parsed(&self) -> &ParsedConfig {
        &self.parsed
    }

    pub fn format(&self) -> ConfigFormat {
        self.parsed.format()
    }

    /// Path of the staged artifact, if it was kept on disk.
    pub fn retained_artifact_path(&self) -> Option<&Path> {
        self.retained_artifact_path.as_deref()
    }

    /// Binds the parsed tree onto `T` by field name.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        self.parsed.bind()
    }

    /// The parsed tree as JSON, regardless of its source format.
    pub fn tree_as_json(&self) -> Result<serde_json::Value, BindError> {
        self.parsed.to_json()
    }
}


/// Loads configuration files of any encoding.
///
/// Each load reads the source once, normalizes it to UTF-8, stages the result
/// as a temporary file carrying the original extension and hands that file to
/// the [`ConfigParser`]. The loader keeps no state between loads; create it once
/// at startup and pass it to whoever needs it.
#[derive(Debug, Clone)]
pub struct ConfigLoader<T = SniffingTranscoder, P = FileFormatParser> {
    options: LoaderOptions,
    transcoder: T,
    parser: P,
}

impl ConfigLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self::with_collaborators(options, SniffingTranscoder, FileFormatParser)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl<T, P> ConfigLoader<T, P>
where
    T: Transcoder,
    P: ConfigParser,
{
    /// Creates a loader with a custom transcoder and parser.
    pub fn with_collaborators(options: LoaderOptions, transcoder: T, parser: P) -> Self {
        Self {
            options,
            transcoder,
            parser,
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads the file at `path`. Its extension selects the parser format.
    pub fn load_path<S: AsRef<Path>>(&self, path: S) -> Result<LoadedConfiguration, LoadError> {
        let path = path.as_ref();
        let origin = path.display().to_string();

        let raw = fs::read(path).map_err(|source| LoadError::Read {
            origin: origin.clone(),
            source,
        })?;

        let extension = path.extension().and_then(|extension| extension.to_str());
        self.load_normalized(&raw, extension, origin)
    }

    /// Loads configuration read to the end from `reader`.
    pub fn load_reader<R: Read>(
        &self,
        mut reader: R,
        extension_hint: Option<&str>,
    ) -> Result<LoadedConfiguration, LoadError> {
        let origin = String::from("<reader>");

        let mut raw = Vec::new();
        reader
            .read_to_end(&mut raw)
            .map_err(|source| LoadError::Read {
                origin: origin.clone(),
                source,
            })?;

        self.load_normalized(&raw, extension_hint, origin)
    }

    /// Loads configuration from an in-memory buffer.
    pub fn load_bytes(
        &self,
        raw: &[u8],
        extension_hint: Option<&str>,
    ) -> Result<LoadedConfiguration, LoadError> {
        self.load_normalized(raw, extension_hint, String::from("<bytes>"))
    }

    /// Loads `path` and binds it onto `C` in one step.
    pub fn load_into<C, S>(&self, path: S) -> Result<C, LoadError>
    where
        C: DeserializeOwned,
        S: AsRef<Path>,
    {
        Ok(self.load_path(path)?.unmarshal()?)
    }

    fn load_normalized(
        &self,
        raw: &[u8],
        extension: Option<&str>,
        origin: String,
    ) -> Result<LoadedConfiguration, LoadError> {
        let normalized = normalize_with(raw, &self.transcoder).map_err(|source| {
            LoadError::EncodingConversion {
                origin: origin.clone(),
                source,
            }
        })?;

        debug!(
            origin = %origin,
            raw_length = raw.len(),
            normalized_length = normalized.len(),
            "Normalized configuration to UTF-8."
        );

        let artifact = stage_normalized_bytes(
            &normalized,
            extension,
            &self.options.temp_directory,
            self.options.keep_temp_artifact,
        )?;

        // The artifact is dropped (and removed, unless retained) on every return path below.
        let parsed = self.parser.parse_file(artifact.path())?;

        info!(origin = %origin, format = %parsed.format(), "Configuration loaded.");

        Ok(LoadedConfiguration {
            parsed,
            retained_artifact_path: artifact.retained_path().map(Path::to_path_buf),
        })
    }
}


#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;
    use crate::error::{EncodingConversionError, ParseError};

    #[derive(Deserialize, Debug, PartialEq)]
    struct Service {
        name: String,
    }

    struct RecordingParser;

    impl ConfigParser for RecordingParser {
        fn parse_file(&self, path: &Path) -> Result<ParsedConfig, ParseError> {
            let contents = fs::read_to_string(path).map_err(|source| ParseError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            Ok(ParsedConfig::Json(serde_json::json!({
                "name": contents,
                "extension": path.extension().and_then(|extension| extension.to_str()),
            })))
        }
    }

    fn loader_in(directory: &TempDir) -> ConfigLoader {
        ConfigLoader::new(LoaderOptions::default().with_temp_directory(directory.path()))
    }

    #[test]
    fn options_default_to_system_temp_directory() {
        let options = LoaderOptions::default();

        assert_eq!(options.temp_directory, std::env::temp_dir());
        assert!(!options.keep_temp_artifact);
    }

    #[test]
    fn in_memory_bytes_are_loaded() {
        let directory = TempDir::new().unwrap();

        let loaded = loader_in(&directory)
            .load_bytes(b"\xEF\xBB\xBFname = \"svc\"\n", Some("toml"))
            .unwrap();

        assert_eq!(loaded.format(), ConfigFormat::Toml);
        assert_eq!(
            loaded.unmarshal::<Service>().unwrap(),
            Service {
                name: "svc".to_string()
            }
        );
    }

    #[test]
    fn reader_input_is_loaded() {
        let directory = TempDir::new().unwrap();
        let reader = std::io::Cursor::new(b"name: svc\n".to_vec());

        let service: Service = loader_in(&directory)
            .load_reader(reader, Some("yaml"))
            .unwrap()
            .unmarshal()
            .unwrap();

        assert_eq!(service.name, "svc");
    }

    #[test]
    fn parser_receives_normalized_staged_file() {
        let directory = TempDir::new().unwrap();
        let loader = ConfigLoader::with_collaborators(
            LoaderOptions::default().with_temp_directory(directory.path()),
            SniffingTranscoder,
            RecordingParser,
        );

        let mut raw = vec![0xFF, 0xFE];
        raw.extend("svc".encode_utf16().flat_map(u16::to_le_bytes));

        let tree = loader.load_bytes(&raw, Some("conf")).unwrap().tree_as_json().unwrap();
        assert_eq!(tree["name"], "svc");
        assert_eq!(tree["extension"], "conf");
    }

    #[test]
    fn toml_tree_renders_datetimes_as_strings() {
        let directory = TempDir::new().unwrap();

        let tree = loader_in(&directory)
            .load_bytes(b"name = \"svc\"\nreleased = 1979-05-27T07:32:00Z\n", Some("toml"))
            .unwrap()
            .tree_as_json()
            .unwrap();

        assert_eq!(tree["released"], "1979-05-27T07:32:00Z");
        assert_eq!(tree["name"], "svc");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let directory = TempDir::new().unwrap();

        let error = loader_in(&directory)
            .load_path(directory.path().join("missing.toml"))
            .unwrap_err();

        assert!(matches!(error, LoadError::Read { .. }));
    }

    #[test]
    fn binary_input_is_an_encoding_error_and_stages_nothing() {
        let directory = TempDir::new().unwrap();

        let error = loader_in(&directory)
            .load_bytes(&[0x00, 0x01, 0x02, 0x9D, 0xFE, 0x03], Some("toml"))
            .unwrap_err();

        match error {
            LoadError::EncodingConversion { source, .. } => assert!(matches!(
                source.conversion_error(),
                EncodingConversionError::UnrecognizedCharset { .. }
                    | EncodingConversionError::MalformedInput { .. }
            )),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
    }

    #[test]
    fn parse_failure_still_removes_the_artifact() {
        let directory = TempDir::new().unwrap();

        let error = loader_in(&directory)
            .load_bytes(b"name = = \"svc\"\n", Some("toml"))
            .unwrap_err();

        assert!(matches!(error, LoadError::Parse(ParseError::Syntax { .. })));
        assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
    }

    #[test]
    fn type_mismatch_is_a_bind_error() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("service.json");
        fs::write(&path, "{\"name\": 42}").unwrap();

        let loader = ConfigLoader::new(
            LoaderOptions::default().with_temp_directory(directory.path().join("staging")),
        );
        fs::create_dir(&loader.options().temp_directory).unwrap();

        let error = loader.load_into::<Service, _>(&path).unwrap_err();
        assert!(matches!(error, LoadError::Bind(_)));
    }
}
