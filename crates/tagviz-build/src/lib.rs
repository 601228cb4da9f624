//! Container image recipe, build context bundling, and eject for tagviz.
//!
//! # Build pipeline
//!
//! ```text
//! tagviz build --tag <image>
//!   1. Dirty check ── git status --porcelain (skip with --allow-dirty)
//!   2. Dockerfile  ── .tagviz/Dockerfile if ejected, else DockerfileGenerator::render()
//!   3. Bundle      ── git ls-files + data/static/templates → .tagviz-bundle/
//!   4. Layout      ── ImageLayout::build_context().verify()
//!   5. Image       ── docker build .tagviz-bundle/
//! ```
//!
//! # Runtime image
//!
//! The runtime stage copies the config file and the three fixed directories
//! under `/app`, creates a writable logs directory, and starts
//! `tagviz-entrypoint start` by default.

pub mod bundle;
pub mod dockerfile;
pub mod eject;
pub mod layout;

pub use dockerfile::{DockerfileGenerator, Step};
pub use layout::{ImageLayout, LayoutError};

use std::path::Path;

use tagviz_core::TagvizConfig;

/// The Dockerfile to build with: the ejected one if present, otherwise a generated one.
pub fn resolve_dockerfile(
    project_dir: &Path,
    config: &TagvizConfig,
) -> Result<String, eject::EjectError> {
    if eject::is_ejected(project_dir) {
        tracing::info!("using ejected Dockerfile from .tagviz/Dockerfile");
        eject::load_ejected_dockerfile(project_dir)
    } else {
        Ok(DockerfileGenerator::new(config).render())
    }
}
