use std::path::{Path, PathBuf};
use std::process::Command;

use tagviz_core::PathsConfig;

use crate::layout::{ImageLayout, LayoutError};

/// Name of the build context directory inside the project.
pub const BUNDLE_DIR: &str = ".tagviz-bundle";

/// Paths that are never copied into the build context,
/// regardless of .gitignore content.
const BUNDLE_EXCLUDES: &[&str] = &[BUNDLE_DIR, ".tagviz", ".git", "target"];

/// Assembles the Docker build context in `.tagviz-bundle/`.
///
/// Source files come from `git ls-files` so `.gitignore` is respected. The
/// data, static, and templates directories are then copied in full, since
/// datasets are commonly kept out of git. The bundle is verified against the
/// build-context layout before the Dockerfile is written into it.
pub fn create_bundle(
    project_dir: &Path,
    paths: &PathsConfig,
    dockerfile_content: &str,
) -> Result<PathBuf, BundleError> {
    let bundle_dir = project_dir.join(BUNDLE_DIR);

    if bundle_dir.exists() {
        std::fs::remove_dir_all(&bundle_dir).map_err(|e| BundleError::Cleanup {
            path: bundle_dir.clone(),
            source: e,
        })?;
    }
    create_dir(&bundle_dir)?;

    let files = git_ls_files(project_dir)?;
    let mut copied = 0usize;
    for relative_path in &files {
        if is_excluded(relative_path, paths) {
            continue;
        }
        copy_file(&project_dir.join(relative_path), &bundle_dir.join(relative_path))?;
        copied += 1;
    }

    for dir in [&paths.data_dir, &paths.static_dir, &paths.templates_dir] {
        let src = project_dir.join(dir);
        if src.is_dir() {
            copied += copy_dir_recursive(&src, &bundle_dir.join(dir))?;
        }
    }
    tracing::debug!(files = copied, bundle = %bundle_dir.display(), "build context assembled");

    ImageLayout::build_context(paths).verify(&bundle_dir)?;

    let dockerfile_path = bundle_dir.join("Dockerfile");
    std::fs::write(&dockerfile_path, dockerfile_content).map_err(|e| {
        BundleError::WriteDockerfile {
            path: dockerfile_path.clone(),
            source: e,
        }
    })?;

    Ok(bundle_dir)
}

fn is_excluded(relative_path: &Path, paths: &PathsConfig) -> bool {
    BUNDLE_EXCLUDES
        .iter()
        .copied()
        .chain(std::iter::once(paths.log_dir.as_str()))
        .any(|ex| relative_path.starts_with(ex))
}

fn create_dir(path: &Path) -> Result<(), BundleError> {
    std::fs::create_dir_all(path).map_err(|e| BundleError::Create {
        path: path.to_path_buf(),
        source: e,
    })
}

fn copy_file(src: &Path, dst: &Path) -> Result<(), BundleError> {
    if let Some(parent) = dst.parent() {
        create_dir(parent)?;
    }
    std::fs::copy(src, dst).map_err(|e| BundleError::CopyFile {
        path: src.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, BundleError> {
    create_dir(dst)?;
    let entries = std::fs::read_dir(src).map_err(|e| BundleError::ReadDir {
        path: src.to_path_buf(),
        source: e,
    })?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| BundleError::ReadDir {
            path: src.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        if path.is_dir() {
            copied += copy_dir_recursive(&path, &target)?;
        } else {
            copy_file(&path, &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Returns the list of files git considers part of the project:
/// tracked files + untracked files that are not .gitignored.
fn git_ls_files(project_dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let stdout = git(project_dir, &["ls-files", "--cached", "--others", "--exclude-standard"])?;
    Ok(stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        // deleted-but-tracked files are still listed by --cached
        .filter(|p| project_dir.join(p).is_file())
        .collect())
}

/// Checks whether the git working tree has uncommitted changes.
pub fn is_dirty(project_dir: &Path) -> Result<bool, BundleError> {
    let stdout = git(project_dir, &["status", "--porcelain"])?;
    Ok(!stdout.trim().is_empty())
}

fn git(project_dir: &Path, args: &[&str]) -> Result<String, BundleError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(project_dir)
        .output()
        .map_err(|e| BundleError::GitCommand {
            detail: format!("failed to execute git {}", args.first().unwrap_or(&"")),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BundleError::GitFailed {
            detail: format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to clean up bundle directory {path}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write Dockerfile at {path}")]
    WriteDockerfile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("build context is incomplete")]
    Layout(#[from] LayoutError),
    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },
    #[error("git failed: {detail}")]
    GitFailed { detail: String },
}
