use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn mdpage(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mdpage").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn converts_the_default_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("documentation.md"), "# Introduction\n\nSome text.\n").unwrap();

    mdpage(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("index.html"));

    let page = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(page.contains("<h1 id=\"introduction\">Introduction</h1>"));
    assert!(dir.path().join("template.html").is_file());
}

#[test]
fn missing_source_exits_with_an_error() {
    let dir = tempfile::tempdir().unwrap();

    mdpage(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[missing input]"));

    assert!(dir.path().join("template.html").is_file());
    assert!(!dir.path().join("index.html").exists());
}

#[test]
fn flags_override_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.md"), "![[x.png]]\n").unwrap();
    fs::write(dir.path().join("mdpage.toml"), "output = \"page.html\"\nimage_dir = \"pics/\"\n").unwrap();

    mdpage(dir.path())
        .args(["notes.md", "-o", "out.html"])
        .assert()
        .success();

    let page = fs::read_to_string(dir.path().join("out.html")).unwrap();
    assert!(page.contains("src=\"pics/x.png\""));
    assert!(!dir.path().join("page.html").exists());
}

#[test]
fn strict_mode_rejects_a_kept_template_without_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("documentation.md"), "text\n").unwrap();
    fs::write(dir.path().join("template.html"), "<main></main>").unwrap();

    mdpage(dir.path())
        .args(["--keep-template", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[missing placeholder]"));

    assert_eq!(fs::read_to_string(dir.path().join("template.html")).unwrap(), "<main></main>");
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("settings.toml"), "bogus = 1\n").unwrap();

    mdpage(dir.path())
        .args(["--config", "settings.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[configuration] failed to load settings"));
}
