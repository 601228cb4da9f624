use std::path::Path;

use tagviz_build::bundle;
use tagviz_core::TagvizConfig;

/// Print the Dockerfile `tagviz build` would use.
pub fn dockerfile() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let config = TagvizConfig::load_or_default(project_dir)?;
    print!("{}", tagviz_build::resolve_dockerfile(project_dir, &config)?);
    Ok(())
}

/// Assemble the build context without building.
pub fn bundle() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let config = TagvizConfig::load_or_default(project_dir)?;
    let dockerfile = tagviz_build::resolve_dockerfile(project_dir, &config)?;

    let bundle_dir = bundle::create_bundle(project_dir, &config.paths, &dockerfile)?;
    println!("Build context ready at {}", bundle_dir.display());
    println!("Build it with: docker build {}", bundle_dir.display());
    Ok(())
}
