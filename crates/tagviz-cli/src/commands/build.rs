use std::path::Path;

use tagviz_build::{ImageLayout, bundle};
use tagviz_core::{APP_ROOT, EntrypointTarget, TagvizConfig};
use tagviz_docker::DockerClient;

/// Bundle the project and build the image with the local Docker daemon.
pub async fn build(tag: &str, allow_dirty: bool) -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let client = DockerClient::new();

    // Dirty check: refuse to build uncommitted changes unless --allow-dirty
    if !allow_dirty && bundle::is_dirty(project_dir)? {
        anyhow::bail!(
            "uncommitted changes detected.\n\
             Commit your changes, or use `tagviz build --allow-dirty` to build anyway."
        );
    }

    // the builder stage compiles the entrypoint from this workspace
    EntrypointTarget::discover(project_dir)?;

    let config = TagvizConfig::load_or_default(project_dir)?;
    let dockerfile = tagviz_build::resolve_dockerfile(project_dir, &config)?;

    println!("Bundling build context...");
    let bundle_dir = bundle::create_bundle(project_dir, &config.paths, &dockerfile)?;

    println!("Building image {tag}...");
    client.build_image(&bundle_dir, tag).await?;

    println!("Verifying image layout...");
    let listing = client.built_image_listing(tag, APP_ROOT).await?;
    ImageLayout::image(&config.paths).verify_listing(Path::new(APP_ROOT), &listing)?;

    println!();
    println!("Built {tag}");
    println!("  Run:    docker run -p {port}:{port} {tag}", port = config.server.port);
    println!("  Shell:  docker run -it {tag} sh");
    Ok(())
}
