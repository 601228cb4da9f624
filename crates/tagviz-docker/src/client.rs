use std::fmt;
use std::path::Path;

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};

/// Docker operations client, parameterized over the executor for testability.
pub struct DockerClient<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DockerExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Doctor ──

    /// Run all diagnostic checks without early return.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        match self
            .executor
            .exec(&args(["version", "--format", "{{.Client.Version}}"]))
            .await
        {
            Ok(v) => report.docker_cli = CheckResult::ok(v.trim()),
            Err(DockerError::CommandFailed { .. }) => {
                // client present, daemon unreachable: version still prints the client part
                report.docker_cli = CheckResult::ok("installed");
            }
            Err(e) => report.docker_cli = CheckResult::fail(&e.to_string()),
        }

        match self.server_version().await {
            Ok(v) => report.docker_daemon = CheckResult::ok(&v),
            Err(_) => report.docker_daemon = CheckResult::fail("daemon not reachable"),
        }

        report
    }

    /// Version of the Docker daemon; fails when the daemon is unreachable.
    pub async fn server_version(&self) -> Result<String, DockerError> {
        let out = self
            .executor
            .exec(&args(["version", "--format", "{{.Server.Version}}"]))
            .await?;
        Ok(out.trim().to_owned())
    }

    // ── Images ──

    /// Build an image from a prepared build context, streaming docker's output.
    pub async fn build_image(&self, context_dir: &Path, tag: &str) -> Result<(), BuildError> {
        let context = context_dir
            .to_str()
            .ok_or_else(|| BuildError::InvalidPath(context_dir.to_path_buf()))?;

        tracing::info!(tag, context, "building image");
        self.executor
            .exec_streaming(&args(["build", "--tag", tag, context]))
            .await
            .map_err(|e| BuildError::Build { source: e })
    }

    pub async fn image_exists(&self, tag: &str) -> bool {
        self.executor
            .exec(&args(["image", "inspect", tag, "--format", "{{.Id}}"]))
            .await
            .is_ok()
    }

    /// List `dir` inside a freshly built image.
    ///
    /// The tag is inspected first so a build that left no image is reported
    /// as such instead of as a failed `docker run`.
    pub async fn built_image_listing(
        &self,
        tag: &str,
        dir: &str,
    ) -> Result<Vec<String>, BuildError> {
        if !self.image_exists(tag).await {
            return Err(BuildError::ImageMissing { tag: tag.to_owned() });
        }
        self.list_dir(tag, dir)
            .await
            .map_err(|e| BuildError::Inspect { source: e })
    }

    /// List the entries of `dir` inside the image; directories carry a trailing `/`.
    ///
    /// Runs through the image's own entrypoint, which passes non-`start`
    /// commands through verbatim.
    pub async fn list_dir(&self, tag: &str, dir: &str) -> Result<Vec<String>, DockerError> {
        let out = self
            .executor
            .exec(&args(["run", "--rm", tag, "ls", "-1", "-p", dir]))
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect())
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub docker_cli: CheckResult,
    pub docker_daemon: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.docker_cli.passed && self.docker_daemon.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] Docker CLI     {}",
            self.docker_cli.icon(),
            self.docker_cli.detail
        )?;
        write!(
            f,
            "[{}] Docker daemon  {}",
            self.docker_daemon.icon(),
            self.docker_daemon.detail
        )
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("build context path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("docker build failed")]
    Build { source: DockerError },

    #[error("image {tag} not found after build")]
    ImageMissing { tag: String },

    #[error("failed to inspect the built image")]
    Inspect { source: DockerError },
}
