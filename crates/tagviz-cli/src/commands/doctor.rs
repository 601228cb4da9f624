use std::path::Path;

use tagviz_build::ImageLayout;
use tagviz_core::{CONFIG_FILE_NAME, TagvizConfig};
use tagviz_docker::DockerClient;

pub async fn doctor() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let report = DockerClient::new().doctor().await;

    println!();
    println!("{report}");

    // Project checks do not stop on the first problem
    let mut project_ok = true;
    let config = match TagvizConfig::load_or_default(project_dir) {
        Ok(config) => {
            let found = project_dir.join(CONFIG_FILE_NAME).is_file();
            println!(
                "[OK] Config         {}",
                if found { "found" } else { "not found, using defaults" }
            );
            Some(config)
        }
        Err(e) => {
            println!("[NG] Config         {e}");
            project_ok = false;
            None
        }
    };

    if let Some(config) = config {
        match ImageLayout::build_context(&config.paths).verify(project_dir) {
            Ok(()) => println!("[OK] Layout         complete"),
            Err(e) => {
                println!("[NG] Layout         {e}");
                project_ok = false;
            }
        }
    }

    if !report.all_passed() || !project_ok {
        anyhow::bail!("some checks failed, see above for details");
    }

    Ok(())
}
