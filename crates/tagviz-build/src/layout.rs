use std::path::{Path, PathBuf};

use tagviz_core::{CONFIG_FILE_NAME, PathsConfig};

/// Kind of filesystem entry a layout requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A required path relative to the layout root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub path: String,
    pub kind: EntryKind,
}

/// The fixed directory layout the server expects under its root.
#[derive(Debug, Clone)]
pub struct ImageLayout {
    entries: Vec<LayoutEntry>,
}

impl ImageLayout {
    /// Layout of a build context: config file plus the directories copied into the image.
    pub fn build_context(paths: &PathsConfig) -> Self {
        let mut entries = vec![file(CONFIG_FILE_NAME)];
        entries.extend(
            [&paths.data_dir, &paths.static_dir, &paths.templates_dir]
                .into_iter()
                .map(|d| dir(d)),
        );
        Self { entries }
    }

    /// Layout of the application root inside a built image (adds the logs directory).
    pub fn image(paths: &PathsConfig) -> Self {
        let mut layout = Self::build_context(paths);
        layout.entries.push(dir(&paths.log_dir));
        layout
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Check `root` against the layout, reporting every missing entry at once.
    pub fn verify(&self, root: &Path) -> Result<(), LayoutError> {
        let missing: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| {
                let path = root.join(&entry.path);
                match entry.kind {
                    EntryKind::File => !path.is_file(),
                    EntryKind::Dir => !path.is_dir(),
                }
            })
            .map(|entry| entry.path.clone())
            .collect();

        if missing.is_empty() {
            tracing::debug!(root = %root.display(), "layout verified");
            Ok(())
        } else {
            Err(LayoutError::Missing {
                root: root.to_path_buf(),
                missing,
            })
        }
    }

    /// Check a one-level `ls -1 -p` listing of `root`, where directories carry
    /// a trailing `/`. Nested entries are checked by their top-level directory.
    pub fn verify_listing(&self, root: &Path, listing: &[String]) -> Result<(), LayoutError> {
        let missing: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| {
                let expected = match entry.path.split_once('/') {
                    Some((top, _)) => format!("{top}/"),
                    None if entry.kind == EntryKind::Dir => format!("{}/", entry.path),
                    None => entry.path.clone(),
                };
                !listing.iter().any(|name| *name == expected)
            })
            .map(|entry| entry.path.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LayoutError::Missing {
                root: root.to_path_buf(),
                missing,
            })
        }
    }
}

fn file(path: &str) -> LayoutEntry {
    LayoutEntry {
        path: path.to_owned(),
        kind: EntryKind::File,
    }
}

fn dir(path: &str) -> LayoutEntry {
    LayoutEntry {
        path: path.to_owned(),
        kind: EntryKind::Dir,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout at {root} is missing: {}", missing.join(", "))]
    Missing { root: PathBuf, missing: Vec<String> },
}
