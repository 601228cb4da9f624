//! Locating the entrypoint binary target via `cargo metadata`.
//!
//! The image recipe compiles `tagviz-entrypoint` from the build context, so
//! the project directory must be a Cargo workspace that defines that binary.

use std::path::{Path, PathBuf};

use cargo_metadata::{MetadataCommand, TargetKind};

use crate::ENTRYPOINT_BINARY;

/// The package and source file providing the entrypoint binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrypointTarget {
    pub package: String,
    pub src_path: PathBuf,
    pub workspace_root: PathBuf,
}

impl EntrypointTarget {
    /// Find the `tagviz-entrypoint` binary among the packages of the
    /// workspace whose manifest is `project_dir/Cargo.toml`.
    pub fn discover(project_dir: &Path) -> crate::Result<Self> {
        let manifest_path = project_dir.join("Cargo.toml");
        tracing::debug!(path = %manifest_path.display(), "running cargo metadata");

        let metadata = MetadataCommand::new()
            .manifest_path(&manifest_path)
            .no_deps()
            .exec()
            .map_err(|e| crate::Error::CargoMetadata {
                manifest_path: manifest_path.clone(),
                detail: e.to_string(),
            })?;
        let workspace_root = PathBuf::from(metadata.workspace_root.as_std_path());

        let found = metadata.packages.iter().find_map(|package| {
            package
                .targets
                .iter()
                .find(|t| t.kind.contains(&TargetKind::Bin) && t.name == ENTRYPOINT_BINARY)
                .map(|target| (package, target))
        });

        let Some((package, target)) = found else {
            return Err(crate::Error::NoEntrypointTarget { workspace_root });
        };

        tracing::debug!(
            package = %package.name,
            workspace_root = %workspace_root.display(),
            "entrypoint target found"
        );
        Ok(Self {
            package: package.name.clone(),
            src_path: PathBuf::from(target.src_path.as_std_path()),
            workspace_root,
        })
    }
}
