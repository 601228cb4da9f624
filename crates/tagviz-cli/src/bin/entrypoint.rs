//! Container entrypoint.
//!
//! `tagviz-entrypoint start` runs the web application in the foreground with
//! the configuration baked into the image. Any other command line is executed
//! verbatim in place of this process, so `docker run <image> sh` drops into a
//! shell.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tagviz_core::{Dispatch, TagvizConfig};

/// Exit status for a missing command, as used by shells for usage errors.
const USAGE_EXIT: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let dispatch = match Dispatch::from_args(std::env::args_os().skip(1)) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(USAGE_EXIT));
        }
    };

    match dispatch {
        Dispatch::Start { config } => {
            start(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Dispatch::Exec { program, args } => exec(program, args),
    }
}

fn start(config_path: &Path) -> anyhow::Result<()> {
    let config = TagvizConfig::load(config_path)?;
    tagviz_server::logging::init(&config)?;
    tracing::info!(config = %config_path.display(), "starting tagviz");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(tagviz_server::serve(config))?;
    Ok(())
}

#[cfg(unix)]
fn exec(program: OsString, args: Vec<OsString>) -> anyhow::Result<ExitCode> {
    use std::os::unix::process::CommandExt;

    // only returns on failure
    let err = std::process::Command::new(&program).args(args).exec();
    Ok(exec_failed(&program, &err))
}

#[cfg(not(unix))]
fn exec(program: OsString, args: Vec<OsString>) -> anyhow::Result<ExitCode> {
    let status = match std::process::Command::new(&program).args(args).status() {
        Ok(status) => status,
        Err(err) => return Ok(exec_failed(&program, &err)),
    };
    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

fn exec_failed(program: &OsString, err: &std::io::Error) -> ExitCode {
    eprintln!("tagviz-entrypoint: {}: {err}", program.to_string_lossy());
    ExitCode::from(exec_failure_status(err.kind()))
}

/// Exit status a POSIX shell reports when it cannot run a command:
/// 127 if it was not found, 126 if it was found but could not be executed.
fn exec_failure_status(kind: std::io::ErrorKind) -> u8 {
    match kind {
        std::io::ErrorKind::NotFound => 127,
        _ => 126,
    }
}
