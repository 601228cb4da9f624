use std::fmt;

use tagviz_core::{APP_ROOT, CONFIG_FILE_NAME, ENTRYPOINT_BINARY, START_COMMAND, TagvizConfig};

/// Where the builder stage keeps the workspace sources.
const BUILD_ROOT: &str = "/src";

/// Install location of the entrypoint binary in the runtime image.
pub const ENTRYPOINT_INSTALL_PATH: &str = "/usr/local/bin/tagviz-entrypoint";

/// One Dockerfile instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Comment(String),
    From {
        image: String,
        alias: Option<String>,
    },
    Workdir(String),
    Copy {
        from: Option<String>,
        src: String,
        dst: String,
    },
    Run(Vec<String>),
    Env {
        key: String,
        value: String,
    },
    Expose(u16),
    Entrypoint(Vec<String>),
    Cmd(Vec<String>),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Comment(text) => write!(f, "# {text}"),
            Step::From { image, alias: None } => write!(f, "FROM {image}"),
            Step::From {
                image,
                alias: Some(alias),
            } => write!(f, "FROM {image} AS {alias}"),
            Step::Workdir(dir) => write!(f, "WORKDIR {dir}"),
            Step::Copy {
                from: Some(stage),
                src,
                dst,
            } => write!(f, "COPY --from={stage} {src} {dst}"),
            Step::Copy { from: None, src, dst } => write!(f, "COPY {src} {dst}"),
            Step::Run(commands) => write!(f, "RUN {}", commands.join(" \\\n    && ")),
            Step::Env { key, value } => write!(f, "ENV {key}={}", quote(value)),
            Step::Expose(port) => write!(f, "EXPOSE {port}"),
            Step::Entrypoint(argv) => write!(f, "ENTRYPOINT {}", exec_form(argv)),
            Step::Cmd(argv) => write!(f, "CMD {}", exec_form(argv)),
        }
    }
}

/// Generates the two-stage Dockerfile for the tagviz image.
///
/// The builder stage compiles the entrypoint; the runtime stage lays out the
/// application root:
///
/// ```text
/// /app/tagviz.toml   server configuration (fixed path)
/// /app/data          dataset files
/// /app/static        static assets
/// /app/templates     HTML templates
/// /app/logs          created empty, writable
/// ```
pub struct DockerfileGenerator<'a> {
    config: &'a TagvizConfig,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a TagvizConfig) -> Self {
        Self { config }
    }

    /// The build as a declarative list of steps.
    pub fn steps(&self) -> Vec<Step> {
        let image = &self.config.image;
        let paths = &self.config.paths;
        let mut steps = vec![
            Step::Comment("=== Stage 1: Builder ===".to_owned()),
            Step::From {
                image: image.base_image.clone(),
                alias: Some("builder".to_owned()),
            },
            Step::Workdir(BUILD_ROOT.to_owned()),
            Step::Copy {
                from: None,
                src: ".".to_owned(),
                dst: ".".to_owned(),
            },
            Step::Run(vec![format!(
                "cargo build --release --bin {ENTRYPOINT_BINARY}"
            )]),
            Step::Comment("=== Stage 2: Runtime ===".to_owned()),
            Step::From {
                image: image.runtime_image.clone(),
                alias: None,
            },
        ];

        if !image.extra_packages.is_empty() {
            steps.push(Step::Run(vec![
                "apt-get update".to_owned(),
                format!(
                    "apt-get install -y --no-install-recommends {}",
                    image.extra_packages.join(" ")
                ),
                "rm -rf /var/lib/apt/lists/*".to_owned(),
            ]));
        }

        steps.push(Step::Workdir(APP_ROOT.to_owned()));
        steps.push(Step::Copy {
            from: Some("builder".to_owned()),
            src: format!("{BUILD_ROOT}/target/release/{ENTRYPOINT_BINARY}"),
            dst: ENTRYPOINT_INSTALL_PATH.to_owned(),
        });
        steps.push(Step::Copy {
            from: None,
            src: CONFIG_FILE_NAME.to_owned(),
            dst: format!("{APP_ROOT}/{CONFIG_FILE_NAME}"),
        });
        for dir in [&paths.data_dir, &paths.static_dir, &paths.templates_dir] {
            steps.push(Step::Copy {
                from: None,
                src: dir.clone(),
                dst: format!("{APP_ROOT}/{dir}"),
            });
        }

        let log_dir = format!("{APP_ROOT}/{}", paths.log_dir);
        steps.push(Step::Run(vec![
            format!("mkdir -p {log_dir}"),
            format!("chmod -R a+rX {APP_ROOT}"),
            format!("chmod a+rwx {log_dir}"),
        ]));

        // sorted for reproducible output
        let mut env: Vec<(&String, &String)> = image.env.iter().collect();
        env.sort();
        for (key, value) in env {
            steps.push(Step::Env {
                key: key.clone(),
                value: value.clone(),
            });
        }

        steps.push(Step::Expose(self.config.server.port));
        steps.push(Step::Entrypoint(vec![ENTRYPOINT_BINARY.to_owned()]));
        steps.push(Step::Cmd(vec![START_COMMAND.to_owned()]));
        steps
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in self.steps() {
            // blank line before each stage header
            if matches!(step, Step::Comment(_)) && !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&step.to_string());
            out.push('\n');
        }
        out
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn exec_form(argv: &[String]) -> String {
    let quoted: Vec<String> = argv.iter().map(|a| quote(a)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_joins_commands_with_continuations() {
        let step = Step::Run(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(step.to_string(), "RUN a \\\n    && b");
    }

    #[test]
    fn env_values_are_quoted() {
        let step = Step::Env {
            key: "GREETING".to_owned(),
            value: "say \"hi\"".to_owned(),
        };
        assert_eq!(step.to_string(), r#"ENV GREETING="say \"hi\"""#);
    }

    #[test]
    fn exec_form_is_json_like() {
        let step = Step::Entrypoint(vec!["tagviz-entrypoint".to_owned()]);
        assert_eq!(step.to_string(), r#"ENTRYPOINT ["tagviz-entrypoint"]"#);
    }
}
