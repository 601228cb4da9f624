use std::path::{Path, PathBuf};

use tagviz_core::TagvizConfig;

/// Run the server from the working tree instead of an image.
pub async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Attempt to load .env file (silently ignore if not found)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = match &config_path {
        Some(path) => TagvizConfig::load(path)?,
        None => TagvizConfig::load_or_default(Path::new("."))?,
    };
    tagviz_server::logging::init(&config)?;
    tracing::debug!(dotenv = dotenv_loaded, "loading configuration");

    println!("Serving on http://{}", config.bind_addr());
    tagviz_server::serve(config).await?;
    Ok(())
}
