use std::path::Path;

use tagviz_build::ImageLayout;
use tagviz_core::TagvizConfig;

/// Verify an application root, e.g. an image's `/app` exported with `docker cp`.
pub fn check_layout(root: &Path) -> anyhow::Result<()> {
    let config = TagvizConfig::load_or_default(root)?;
    let layout = ImageLayout::image(&config.paths);
    layout.verify(root)?;

    println!("Layout at {} is complete:", root.display());
    for entry in layout.entries() {
        println!("  {}", entry.path);
    }
    Ok(())
}
