//! Core types and configuration for tagviz.
//!
//! This crate defines the `tagviz.toml` schema ([`TagvizConfig`]), the
//! artist/tag dataset ([`Catalog`]), the tag ranking behind the chart
//! ([`TagChart`]), the entrypoint's argument dispatch ([`Dispatch`]), the
//! lookup of the binary target the image builds ([`EntrypointTarget`]), and
//! shared error types.

pub mod cargo;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod entrypoint;
pub mod error;

pub use cargo::EntrypointTarget;
pub use chart::{ChartOutcome, TagChart, TagPoint};
pub use config::{
    APP_ROOT, CONFIG_FILE_NAME, CONTAINER_CONFIG_PATH, DatasetConfig, ImageConfig, PathsConfig,
    ServerConfig, TagvizConfig,
};
pub use dataset::Catalog;
pub use entrypoint::{Dispatch, ENTRYPOINT_BINARY, NoCommand, START_COMMAND};
pub use error::{Error, Result};
