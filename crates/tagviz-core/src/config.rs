use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the server configuration, both in the project and in the image.
pub const CONFIG_FILE_NAME: &str = "tagviz.toml";

/// Application root inside the container image.
pub const APP_ROOT: &str = "/app";

/// Fixed configuration path the entrypoint starts the server with.
pub const CONTAINER_CONFIG_PATH: &str = "/app/tagviz.toml";

/// tagviz.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagvizConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub image: ImageConfig,
    /// Directory the config was loaded from; relative paths resolve against it.
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the application listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Directories the server reads from (and writes logs to).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// Dataset file names, relative to `paths.data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_artists")]
    pub artists: String,
    #[serde(default = "default_tags")]
    pub tags: String,
    #[serde(default = "default_tagged_artists")]
    pub tagged_artists: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Rust builder image
    #[serde(default = "default_base_image")]
    pub base_image: String,
    /// Runtime base image
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// Additional system packages to install via apt-get in the runtime stage
    #[serde(default)]
    pub extra_packages: Vec<String>,
    /// Static environment variables baked into the container image.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            static_dir: default_static_dir(),
            templates_dir: default_templates_dir(),
            log_dir: default_log_dir(),
            log_file: default_log_file(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            artists: default_artists(),
            tags: default_tags(),
            tagged_artists: default_tagged_artists(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_image: default_base_image(),
            runtime_image: default_runtime_image(),
            extra_packages: Vec::new(),
            env: HashMap::new(),
        }
    }
}

impl TagvizConfig {
    /// Load the config file at `path`. A missing file is an error.
    pub fn load(path: &Path) -> crate::Result<Self> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.paths.validate()?;
        Ok(config)
    }

    /// Load `tagviz.toml` from the project directory, or return defaults if not found.
    pub fn load_or_default(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self {
                root: project_dir.to_path_buf(),
                ..Self::default()
            })
        }
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.resolve(&self.paths.data_dir)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.resolve(&self.paths.static_dir)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.paths.templates_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.paths.log_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir().join(&self.paths.log_file)
    }

    pub fn artists_path(&self) -> PathBuf {
        self.data_dir().join(&self.dataset.artists)
    }

    pub fn tags_path(&self) -> PathBuf {
        self.data_dir().join(&self.dataset.tags)
    }

    pub fn tagged_artists_path(&self) -> PathBuf {
        self.data_dir().join(&self.dataset.tagged_artists)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl PathsConfig {
    /// Directories copied into (or created in) the image, in build order.
    pub fn image_dirs(&self) -> [&str; 4] {
        [
            self.data_dir.as_str(),
            self.static_dir.as_str(),
            self.templates_dir.as_str(),
            self.log_dir.as_str(),
        ]
    }

    /// Every directory must be a plain relative path so it can be mirrored under the app root.
    pub fn validate(&self) -> crate::Result<()> {
        for dir in self.image_dirs() {
            validate_relative(dir)?;
        }
        if self.log_file.is_empty() || self.log_file.contains(['/', '\\']) {
            return Err(crate::Error::InvalidPath {
                path: self.log_file.clone(),
                reason: "log_file must be a bare file name",
            });
        }
        Ok(())
    }
}

fn validate_relative(path: &str) -> crate::Result<()> {
    if path.trim().is_empty() {
        return Err(crate::Error::InvalidPath {
            path: path.to_owned(),
            reason: "path must not be empty",
        });
    }
    let p = Path::new(path);
    if p.is_absolute() {
        return Err(crate::Error::InvalidPath {
            path: path.to_owned(),
            reason: "path must be relative to the project root",
        });
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(crate::Error::InvalidPath {
            path: path.to_owned(),
            reason: "path must not contain '..'",
        });
    }
    Ok(())
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8000
}

fn default_data_dir() -> String {
    "data".to_owned()
}

fn default_static_dir() -> String {
    "static".to_owned()
}

fn default_templates_dir() -> String {
    "templates".to_owned()
}

fn default_log_dir() -> String {
    "logs".to_owned()
}

fn default_log_file() -> String {
    "tagviz.log".to_owned()
}

fn default_artists() -> String {
    "artists.dat".to_owned()
}

fn default_tags() -> String {
    "tags.dat".to_owned()
}

fn default_tagged_artists() -> String {
    "user_taggedartists.dat".to_owned()
}

fn default_base_image() -> String {
    "rust:1.85-bookworm".to_owned()
}

fn default_runtime_image() -> String {
    "debian:bookworm-slim".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_root() {
        let config = TagvizConfig {
            root: PathBuf::from("/srv/app"),
            ..Default::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/srv/app/data"));
        assert_eq!(
            config.tags_path(),
            PathBuf::from("/srv/app/data/tags.dat")
        );
        assert_eq!(
            config.log_path(),
            PathBuf::from("/srv/app/logs/tagviz.log")
        );
    }

    #[test]
    fn validate_rejects_parent_dir() {
        let paths = PathsConfig {
            data_dir: "../data".to_owned(),
            ..Default::default()
        };
        let err = paths.validate().unwrap_err().to_string();
        assert!(err.contains(".."), "got: {err}");
    }

    #[test]
    fn validate_rejects_absolute() {
        let paths = PathsConfig {
            static_dir: "/var/www".to_owned(),
            ..Default::default()
        };
        assert!(paths.validate().is_err());
    }

    #[test]
    fn validate_rejects_nested_log_file() {
        let paths = PathsConfig {
            log_file: "nested/app.log".to_owned(),
            ..Default::default()
        };
        assert!(paths.validate().is_err());
    }

    #[test]
    fn container_config_path_is_under_app_root() {
        assert_eq!(
            Path::new(CONTAINER_CONFIG_PATH),
            Path::new(APP_ROOT).join(CONFIG_FILE_NAME)
        );
    }
}
