/*!
End-to-end loads through staging and the structured-config parser.
*/

use std::{fs, path::Path};

use confnorm::{ConfigFormat, ConfigLoader, LoadError, LoaderOptions};
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Deserialize, Debug, PartialEq)]
struct Service {
    name: String,
}

#[derive(Deserialize, Debug, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
    tags: Vec<String>,
}

#[derive(Deserialize, Debug, PartialEq)]
struct Settings {
    service: Service,
    endpoint: Endpoint,
}


struct Workspace {
    _root: TempDir,
    sources: std::path::PathBuf,
    staging: std::path::PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let sources = root.path().join("sources");
        let staging = root.path().join("staging");
        fs::create_dir(&sources).unwrap();
        fs::create_dir(&staging).unwrap();

        Self {
            _root: root,
            sources,
            staging,
        }
    }

    fn write(&self, file_name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = self.sources.join(file_name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn loader(&self, keep_temp_artifact: bool) -> ConfigLoader {
        ConfigLoader::new(
            LoaderOptions::default()
                .with_temp_directory(&self.staging)
                .with_keep_temp_artifact(keep_temp_artifact),
        )
    }

    fn staged_artifacts(&self) -> usize {
        count_entries(&self.staging)
    }
}

fn count_entries(directory: &Path) -> usize {
    fs::read_dir(directory).unwrap().count()
}


#[test]
fn utf16le_file_loads_into_structure() {
    let workspace = Workspace::new();

    let mut raw = vec![0xFF, 0xFE];
    raw.extend("name = \"svc\"".encode_utf16().flat_map(u16::to_le_bytes));
    let path = workspace.write("service.toml", &raw);

    let service: Service = workspace.loader(false).load_into(&path).unwrap();

    assert_eq!(
        service,
        Service {
            name: "svc".to_string()
        }
    );
}

#[test]
fn plain_utf8_toml_loads_unchanged() {
    let workspace = Workspace::new();
    let contents = "[service]\n\
                    name = \"svc\"\n\
                    \n\
                    [endpoint]\n\
                    host = \"localhost\"\n\
                    port = 8080\n\
                    tags = [\"a\", \"b\"]\n";
    let path = workspace.write("settings.toml", contents.as_bytes());

    let loaded = workspace.loader(false).load_path(&path).unwrap();

    assert_eq!(loaded.format(), ConfigFormat::Toml);
    assert_eq!(
        loaded.unmarshal::<Settings>().unwrap(),
        Settings {
            service: Service {
                name: "svc".to_string()
            },
            endpoint: Endpoint {
                host: "localhost".to_string(),
                port: 8080,
                tags: vec!["a".to_string(), "b".to_string()],
            },
        }
    );
    // The source itself is never modified.
    assert_eq!(fs::read(&path).unwrap(), contents.as_bytes());
}

#[test]
fn keep_temp_artifact_leaves_exactly_one_artifact() {
    let workspace = Workspace::new();
    let path = workspace.write("service.toml", b"\xEF\xBB\xBFname = \"svc\"\n");

    let loaded = workspace.loader(true).load_path(&path).unwrap();

    assert_eq!(workspace.staged_artifacts(), 1);

    let artifact_path = loaded.retained_artifact_path().unwrap();
    assert!(artifact_path.starts_with(&workspace.staging));
    assert_eq!(
        artifact_path.extension().and_then(|extension| extension.to_str()),
        Some("toml")
    );
    // The retained artifact holds the normalized bytes.
    assert_eq!(fs::read(artifact_path).unwrap(), b"name = \"svc\"\n");
}

#[test]
fn default_options_leave_no_artifact() {
    let workspace = Workspace::new();
    let path = workspace.write("service.toml", b"name = \"svc\"\n");

    let loaded = workspace.loader(false).load_path(&path).unwrap();

    assert!(loaded.retained_artifact_path().is_none());
    assert_eq!(workspace.staged_artifacts(), 0);
}

#[test]
fn failures_leave_no_artifact() {
    let workspace = Workspace::new();
    let broken = workspace.write("broken.json", b"{\"name\": ");
    let mismatched = workspace.write("mismatched.yaml", b"name: [1, 2]\n");

    let loader = workspace.loader(false);

    assert!(matches!(
        loader.load_path(&broken),
        Err(LoadError::Parse(_))
    ));
    assert!(matches!(
        loader.load_into::<Service, _>(&mismatched),
        Err(LoadError::Bind(_))
    ));
    assert_eq!(workspace.staged_artifacts(), 0);
}

#[test]
fn legacy_encoded_yaml_loads() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct City {
        city: String,
        description: String,
    }

    let workspace = Workspace::new();
    let text = "city: Москва\n\
                description: Сервис обрабатывает входящие заказы и отправляет уведомления клиентам\n";
    let (encoded, _, _) = encoding_rs::WINDOWS_1251.encode(text);
    let path = workspace.write("city.yml", &encoded);

    let city: City = workspace.loader(false).load_into(&path).unwrap();

    assert_eq!(city.city, "Москва");
    assert!(city.description.starts_with("Сервис"));
}

#[test]
fn binary_file_is_an_encoding_error() {
    let workspace = Workspace::new();
    let path = workspace.write("binary.toml", &[0x00, 0x9D, 0x01, 0xFF, 0x02, 0x81, 0x7F]);

    let error = workspace.loader(false).load_path(&path).unwrap_err();

    assert!(matches!(error, LoadError::EncodingConversion { .. }));
    assert_eq!(workspace.staged_artifacts(), 0);
}

#[test]
fn unreadable_source_is_a_read_error() {
    let workspace = Workspace::new();

    let error = workspace
        .loader(false)
        .load_path(workspace.sources.join("absent.toml"))
        .unwrap_err();

    assert!(matches!(error, LoadError::Read { .. }));
}
