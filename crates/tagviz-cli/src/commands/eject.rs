use std::path::Path;

use tagviz_build::DockerfileGenerator;
use tagviz_core::TagvizConfig;

pub fn eject() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let config = TagvizConfig::load_or_default(project_dir)?;

    let dockerfile = DockerfileGenerator::new(&config).render();
    tagviz_build::eject::eject(project_dir, &dockerfile)?;

    println!("Ejected build config to .tagviz/Dockerfile");
    println!("You can now edit it directly. tagviz build will use this file.");
    Ok(())
}
