#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("docker CLI not found; install Docker: https://docs.docker.com/get-docker/")]
    NotFound { source: std::io::Error },

    #[error("docker command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("failed to read docker output")]
    Output { source: std::io::Error },

    #[error("docker output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}
