use tagviz_core::{CONFIG_FILE_NAME, TagvizConfig};
use tempfile::TempDir;

#[test]
fn load_or_default_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = TagvizConfig::load_or_default(tmp.path()).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.paths.data_dir, "data");
    assert_eq!(config.paths.static_dir, "static");
    assert_eq!(config.paths.templates_dir, "templates");
    assert_eq!(config.paths.log_dir, "logs");
    assert_eq!(config.paths.log_file, "tagviz.log");
    assert_eq!(config.dataset.artists, "artists.dat");
    assert_eq!(config.dataset.tags, "tags.dat");
    assert_eq!(config.dataset.tagged_artists, "user_taggedartists.dat");
    assert_eq!(config.image.base_image, "rust:1.85-bookworm");
    assert_eq!(config.image.runtime_image, "debian:bookworm-slim");
    assert!(config.image.extra_packages.is_empty());
    assert!(config.image.env.is_empty());
    assert_eq!(config.root, tmp.path());
}

#[test]
fn load_missing_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = TagvizConfig::load(&tmp.path().join(CONFIG_FILE_NAME));

    let err = result.unwrap_err().to_string();
    assert!(err.contains("failed to load config"), "got: {err}");
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[server]
host = "127.0.0.1"
port = 5000

[paths]
data_dir = "dataset"
static_dir = "assets"
templates_dir = "views"
log_dir = "var/log"
log_file = "app.log"

[dataset]
artists = "a.tsv"
tags = "t.tsv"
tagged_artists = "ta.tsv"

[image]
base_image = "rust:1.86-slim"
runtime_image = "gcr.io/distroless/cc-debian12"
extra_packages = ["ca-certificates", "tini"]

[image.env]
RUST_LOG = "debug"
"#;
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, toml).unwrap();

    let config = TagvizConfig::load(&path).unwrap();

    assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    assert_eq!(config.paths.log_dir, "var/log");
    assert_eq!(config.image.base_image, "rust:1.86-slim");
    assert_eq!(config.image.runtime_image, "gcr.io/distroless/cc-debian12");
    assert_eq!(config.image.extra_packages, vec!["ca-certificates", "tini"]);
    assert_eq!(config.image.env["RUST_LOG"], "debug");
    assert_eq!(config.artists_path(), tmp.path().join("dataset/a.tsv"));
    assert_eq!(config.tagged_artists_path(), tmp.path().join("dataset/ta.tsv"));
    assert_eq!(config.static_dir(), tmp.path().join("assets"));
    assert_eq!(config.templates_dir(), tmp.path().join("views"));
    assert_eq!(config.log_path(), tmp.path().join("var/log/app.log"));
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[server]
port = 9000
"#;
    std::fs::write(tmp.path().join(CONFIG_FILE_NAME), toml).unwrap();

    let config = TagvizConfig::load_or_default(tmp.path()).unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.paths.data_dir, "data");
    assert_eq!(config.image.runtime_image, "debian:bookworm-slim");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "not valid {{{{ toml").unwrap();

    let result = TagvizConfig::load_or_default(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();

    let config = TagvizConfig::load_or_default(tmp.path()).unwrap();
    assert_eq!(config.server.port, 8000);
}

#[test]
fn load_rejects_escaping_data_dir() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[paths]
data_dir = "../elsewhere"
"#;
    std::fs::write(tmp.path().join(CONFIG_FILE_NAME), toml).unwrap();

    let err = TagvizConfig::load_or_default(tmp.path())
        .unwrap_err()
        .to_string();
    assert!(err.contains("../elsewhere"), "got: {err}");
}
