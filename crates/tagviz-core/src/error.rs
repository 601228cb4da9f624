use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    // ── Dataset ──
    #[error("failed to open dataset file {path}")]
    DatasetOpen { path: PathBuf, source: csv::Error },

    #[error("malformed record in {path} at line {line}: {detail}")]
    DatasetRecord {
        path: PathBuf,
        line: u64,
        detail: String,
    },

    // ── Cargo project ──
    #[error("cargo metadata failed for {manifest_path}: {detail}")]
    CargoMetadata {
        manifest_path: PathBuf,
        detail: String,
    },

    #[error(
        "no `tagviz-entrypoint` binary target in the workspace at {workspace_root}; \
         run tagviz from the tagviz workspace"
    )]
    NoEntrypointTarget { workspace_root: PathBuf },

    // ── Chart ──
    #[error("unknown artist '{0}'")]
    UnknownArtist(String),

    #[error("tag id {tag_id} used by '{artist}' has no tag value")]
    UnknownTag { artist: String, tag_id: u32 },
}
