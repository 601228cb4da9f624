mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tagviz", about = "Build and run the tagviz artist tag explorer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold tagviz.toml and the data, static, templates and logs directories
    Init,
    /// Print the generated Dockerfile
    Dockerfile,
    /// Assemble the Docker build context in .tagviz-bundle/
    Bundle,
    /// Eject Dockerfile for manual customization
    Eject,
    /// Build the container image with the local Docker daemon
    Build {
        /// Image tag, e.g. tagviz:latest
        #[arg(long, short = 't')]
        tag: String,
        /// Allow building with uncommitted changes
        #[arg(long)]
        allow_dirty: bool,
    },
    /// Check Docker setup and project readiness
    Doctor,
    /// Verify a directory has the application layout (config, data, static, templates, logs)
    CheckLayout {
        /// Application root to check
        root: PathBuf,
    },
    /// Run the web application locally
    Serve {
        /// Path to tagviz.toml (default: ./tagviz.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // serve installs the server's own subscriber, which also writes the log file
    if !matches!(cli.command, Commands::Serve { .. }) {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Init => commands::init_project()?,
        Commands::Dockerfile => commands::dockerfile()?,
        Commands::Bundle => commands::bundle()?,
        Commands::Eject => commands::eject()?,
        Commands::Build { tag, allow_dirty } => commands::build(&tag, allow_dirty).await?,
        Commands::Doctor => commands::doctor().await?,
        Commands::CheckLayout { root } => commands::check_layout(&root)?,
        Commands::Serve { config } => commands::serve(config).await?,
    }

    Ok(())
}
