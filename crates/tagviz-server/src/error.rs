use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load configuration")]
    Config(#[source] tagviz_core::Error),

    #[error("failed to load dataset")]
    Dataset(#[source] tagviz_core::Error),

    #[error("failed to read template {path}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server terminated with an I/O error")]
    Serve(#[source] std::io::Error),
}
