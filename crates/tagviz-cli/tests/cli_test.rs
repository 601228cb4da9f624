use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn tagviz() -> assert_cmd::Command {
    cargo_bin_cmd!("tagviz")
}

fn entrypoint() -> assert_cmd::Command {
    cargo_bin_cmd!("tagviz-entrypoint")
}

/// A Cargo project defining the given binary target.
fn write_cargo_project(dir: &Path, bin_name: &str) {
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(
        dir.join("Cargo.toml"),
        format!(
            "[package]\nname = \"demo\"\nversion = \"0.1.0\"\nedition = \"2021\"\n\n\
             [[bin]]\nname = \"{bin_name}\"\npath = \"src/main.rs\"\n"
        ),
    )
    .unwrap();
    std::fs::write(dir.join("src/main.rs"), "fn main() {}\n").unwrap();
}

/// A project the image recipe can build.
fn write_project(dir: &Path) {
    write_cargo_project(dir, "tagviz-entrypoint");
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

// ── Help / Version ──

#[test]
fn shows_help() {
    tagviz()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("artist tag explorer"));
}

#[test]
fn shows_version() {
    tagviz()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagviz"));
}

// ── Entrypoint ──

#[test]
fn entrypoint_execs_other_commands_verbatim() {
    entrypoint()
        .args(["echo", "hello", "start"])
        .assert()
        .success()
        .stdout("hello start\n");
}

#[test]
fn entrypoint_passes_exit_status_through() {
    entrypoint()
        .args(["sh", "-c", "exit 3"])
        .assert()
        .code(3);
}

#[test]
fn entrypoint_start_is_case_sensitive() {
    entrypoint()
        .arg("START")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("START"));
}

#[test]
fn entrypoint_missing_command_exits_127() {
    entrypoint()
        .args(["tagviz-no-such-command", "--flag"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("tagviz-entrypoint: tagviz-no-such-command"));
}

#[cfg(unix)]
#[test]
fn entrypoint_non_executable_command_exits_126() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("script.sh");
    std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

    entrypoint().arg(&script).assert().code(126);
}

#[test]
fn entrypoint_without_arguments_is_usage_error() {
    entrypoint()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: tagviz-entrypoint start"));
}

#[test]
fn entrypoint_start_fails_without_baked_config() {
    // no /app/tagviz.toml outside the image
    if Path::new("/app/tagviz.toml").exists() {
        return;
    }
    entrypoint()
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/app/tagviz.toml"));
}

// ── Init ──

#[test]
fn init_scaffolds_layout() {
    let tmp = TempDir::new().unwrap();
    write_project(tmp.path());

    tagviz()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created tagviz.toml"));

    for dir in ["data", "static", "templates", "logs"] {
        assert!(tmp.path().join(dir).is_dir(), "{dir} missing");
    }
    let index = std::fs::read_to_string(tmp.path().join("templates/index.html")).unwrap();
    assert!(index.contains("{{ form }}"));
    let gitignore = std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
    assert!(gitignore.contains("/.tagviz-bundle"));
}

#[test]
fn init_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write_project(tmp.path());

    tagviz().current_dir(tmp.path()).arg("init").assert().success();
    tagviz()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"))
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_requires_cargo_project() {
    let tmp = TempDir::new().unwrap();

    tagviz()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cargo metadata failed"));
    assert!(!tmp.path().join("tagviz.toml").exists());
}

#[test]
fn init_refuses_project_without_entrypoint_binary() {
    let tmp = TempDir::new().unwrap();
    write_cargo_project(tmp.path(), "my-api");

    tagviz()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no `tagviz-entrypoint` binary target",
        ));
    assert!(!tmp.path().join("tagviz.toml").exists());
    assert!(!tmp.path().join("data").exists());
}

// ── Dockerfile / Eject ──

#[test]
fn dockerfile_uses_configured_port() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("tagviz.toml"), "[server]\nport = 9000\n").unwrap();

    tagviz()
        .current_dir(tmp.path())
        .arg("dockerfile")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXPOSE 9000"))
        .stdout(predicate::str::contains(r#"ENTRYPOINT ["tagviz-entrypoint"]"#))
        .stdout(predicate::str::contains(r#"CMD ["start"]"#));
}

#[test]
fn eject_creates_dockerfile_in_tagviz_dir() {
    let tmp = TempDir::new().unwrap();

    tagviz()
        .current_dir(tmp.path())
        .arg("eject")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ejected"));

    let content = std::fs::read_to_string(tmp.path().join(".tagviz/Dockerfile")).unwrap();
    assert!(content.contains("FROM debian:bookworm-slim"));
}

#[test]
fn eject_fails_on_second_run() {
    let tmp = TempDir::new().unwrap();

    tagviz().current_dir(tmp.path()).arg("eject").assert().success();
    tagviz()
        .current_dir(tmp.path())
        .arg("eject")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already ejected"));
}

#[test]
fn dockerfile_prefers_ejected_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join(".tagviz")).unwrap();
    std::fs::write(tmp.path().join(".tagviz/Dockerfile"), "FROM scratch\n").unwrap();

    tagviz()
        .current_dir(tmp.path())
        .arg("dockerfile")
        .assert()
        .success()
        .stdout("FROM scratch\n");
}

// ── Bundle / Build ──

#[test]
fn bundle_reports_missing_layout() {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q"]);
    write_project(tmp.path());

    tagviz()
        .current_dir(tmp.path())
        .arg("bundle")
        .assert()
        .failure()
        .stderr(predicate::str::contains("build context is incomplete"));
}

#[test]
fn bundle_assembles_context() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    git(dir, &["init", "-q"]);
    write_project(dir);
    tagviz().current_dir(dir).arg("init").assert().success();
    std::fs::write(dir.join("data/artists.dat"), "id\tname\n").unwrap();

    tagviz()
        .current_dir(dir)
        .arg("bundle")
        .assert()
        .success()
        .stdout(predicate::str::contains(".tagviz-bundle"));

    let bundle = dir.join(".tagviz-bundle");
    assert!(bundle.join("Dockerfile").is_file());
    assert!(bundle.join("tagviz.toml").is_file());
    assert!(bundle.join("data/artists.dat").is_file());
    assert!(bundle.join("templates/index.html").is_file());
}

#[test]
fn build_fails_on_non_git_directory() {
    let tmp = TempDir::new().unwrap();
    write_project(tmp.path());

    tagviz()
        .current_dir(tmp.path())
        .args(["build", "--tag", "tagviz:test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("git"));
}

#[test]
fn build_dirty_repo_blocked_without_flag() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write_project(dir);
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "init"]);

    std::fs::write(dir.join("tagviz.toml"), "[server]\nport = 8001\n").unwrap();

    tagviz()
        .current_dir(dir)
        .args(["build", "--tag", "tagviz:test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("uncommitted changes"));
}

#[test]
fn build_refuses_project_without_entrypoint_binary() {
    let tmp = TempDir::new().unwrap();
    write_cargo_project(tmp.path(), "my-api");

    tagviz()
        .current_dir(tmp.path())
        .args(["build", "--tag", "tagviz:test", "--allow-dirty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no `tagviz-entrypoint` binary target",
        ));
    assert!(!tmp.path().join(".tagviz-bundle").exists());
}

#[test]
fn build_requires_tag() {
    tagviz()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tag"));
}

// ── Check layout ──

#[test]
fn check_layout_lists_every_missing_entry() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("data")).unwrap();

    tagviz()
        .arg("check-layout")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "tagviz.toml, static, templates, logs",
        ));
}

#[test]
fn check_layout_accepts_complete_root() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("tagviz.toml"), "").unwrap();
    for dir in ["data", "static", "templates", "logs"] {
        std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
    }

    tagviz()
        .arg("check-layout")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is complete"));
}

// ── Serve ──

#[test]
fn serve_fails_with_missing_config() {
    let tmp = TempDir::new().unwrap();

    tagviz()
        .current_dir(tmp.path())
        .args(["serve", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}
