//! Argument dispatch for the container entrypoint.
//!
//! ```text
//! tagviz-entrypoint start          -> run the server with /app/tagviz.toml
//! tagviz-entrypoint <cmd> [args]   -> exec <cmd> [args] verbatim
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use crate::CONTAINER_CONFIG_PATH;

/// Name of the dispatcher binary installed in the image.
pub const ENTRYPOINT_BINARY: &str = "tagviz-entrypoint";

/// The only argument the dispatcher recognizes.
pub const START_COMMAND: &str = "start";

/// What the entrypoint does with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Run the application server in the foreground.
    Start { config: PathBuf },
    /// Replace the current process with `program args...`.
    Exec {
        program: OsString,
        args: Vec<OsString>,
    },
}

impl Dispatch {
    /// Decide from the arguments following the program name.
    ///
    /// Only the first argument is inspected; the rest are passed through untouched.
    pub fn from_args<I, S>(args: I) -> Result<Self, NoCommand>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next().ok_or(NoCommand)?;

        if program == START_COMMAND {
            return Ok(Self::Start {
                config: PathBuf::from(CONTAINER_CONFIG_PATH),
            });
        }

        Ok(Self::Exec {
            program,
            args: args.collect(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no command given; usage: tagviz-entrypoint start | <command> [args...]")]
pub struct NoCommand;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_uses_fixed_config_path() {
        let dispatch = Dispatch::from_args(["start"]).unwrap();
        assert_eq!(
            dispatch,
            Dispatch::Start {
                config: PathBuf::from("/app/tagviz.toml")
            }
        );
    }

    #[test]
    fn other_commands_pass_through_verbatim() {
        let dispatch = Dispatch::from_args(["sh", "-c", "echo start && ls /app"]).unwrap();
        assert_eq!(
            dispatch,
            Dispatch::Exec {
                program: "sh".into(),
                args: vec!["-c".into(), "echo start && ls /app".into()],
            }
        );
    }

    #[test]
    fn start_is_case_sensitive() {
        let dispatch = Dispatch::from_args(["START"]).unwrap();
        assert!(matches!(dispatch, Dispatch::Exec { .. }));
    }

    #[test]
    fn start_as_later_argument_is_passed_through() {
        let dispatch = Dispatch::from_args(["env", "start"]).unwrap();
        assert_eq!(
            dispatch,
            Dispatch::Exec {
                program: "env".into(),
                args: vec!["start".into()],
            }
        );
    }

    #[test]
    fn empty_args_is_an_error() {
        let result = Dispatch::from_args(Vec::<OsString>::new());
        assert_eq!(result, Err(NoCommand));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn exec_preserves_every_argument(
                program in "[a-z/._-]{1,16}".prop_filter("not start", |p| p != START_COMMAND),
                rest in proptest::collection::vec(".*", 0..6),
            ) {
                let mut argv = vec![program.clone()];
                argv.extend(rest.iter().cloned());

                let dispatch = Dispatch::from_args(argv).unwrap();
                let expected = Dispatch::Exec {
                    program: program.into(),
                    args: rest.into_iter().map(OsString::from).collect(),
                };
                prop_assert_eq!(dispatch, expected);
            }
        }
    }
}
