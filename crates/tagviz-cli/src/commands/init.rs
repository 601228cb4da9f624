use std::path::Path;

use tagviz_core::{CONFIG_FILE_NAME, EntrypointTarget, PathsConfig};

const TAGVIZ_TOML: &str = r#"[server]
# host = "0.0.0.0"
# port = 8000

[paths]
# data_dir = "data"
# static_dir = "static"
# templates_dir = "templates"
# log_dir = "logs"
# log_file = "tagviz.log"

[dataset]
# artists = "artists.dat"
# tags = "tags.dat"
# tagged_artists = "user_taggedartists.dat"

[image]
# base_image = "rust:1.85-bookworm"
# runtime_image = "debian:bookworm-slim"
# extra_packages = []
# env = {}
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>tagviz</title>
</head>
<body>
  <h1>{{ artist }}</h1>
  {{ error_msg }}
  {{ form }}
  <div id="chart">{{ chart }}</div>
</body>
</html>
"#;

const GITIGNORE_ENTRIES: &[&str] = &["/target", "/.tagviz-bundle", "/logs"];

/// Scaffold the runtime assets in the tagviz workspace.
///
/// The image compiles `tagviz-entrypoint` from this directory, so a project
/// that does not define that binary is refused.
pub fn init_project() -> anyhow::Result<()> {
    let target = EntrypointTarget::discover(Path::new("."))?;
    tracing::debug!(package = %target.package, "entrypoint target found");

    let mut created = Vec::new();

    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        eprintln!("{CONFIG_FILE_NAME} already exists, skipping");
    } else {
        std::fs::write(config_path, TAGVIZ_TOML)?;
        created.push(CONFIG_FILE_NAME.to_owned());
    }

    let paths = PathsConfig::default();
    for dir in paths.image_dirs() {
        let path = Path::new(dir);
        if !path.is_dir() {
            std::fs::create_dir_all(path)?;
            created.push(format!("{dir}/"));
        }
    }

    let index_path = Path::new(&paths.templates_dir).join(tagviz_server::page::INDEX_TEMPLATE);
    if !index_path.exists() {
        std::fs::write(&index_path, INDEX_HTML)?;
        created.push(index_path.display().to_string());
    }

    if update_gitignore(Path::new(".gitignore"))? {
        created.push(".gitignore entries".to_owned());
    }

    if created.is_empty() {
        println!("Nothing to create, already initialized.");
    } else {
        for f in &created {
            println!("Created {f}");
        }
    }

    println!();
    println!("Next steps:");
    println!("  1. Put artists.dat, tags.dat and user_taggedartists.dat in {}/", paths.data_dir);
    println!("  2. Run locally:      tagviz serve");
    println!("  3. Build the image:  tagviz build --tag tagviz:latest");
    Ok(())
}

/// Append missing ignore entries. Returns whether the file changed.
fn update_gitignore(path: &Path) -> anyhow::Result<bool> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let missing: Vec<&str> = GITIGNORE_ENTRIES
        .iter()
        .copied()
        .filter(|entry| !existing.lines().any(|line| line.trim() == *entry))
        .collect();
    if missing.is_empty() {
        return Ok(false);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for entry in missing {
        content.push_str(entry);
        content.push('\n');
    }
    std::fs::write(path, content)?;
    Ok(true)
}
