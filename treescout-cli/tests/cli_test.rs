use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// Helper function to create test files
fn create_test_files(dir: impl AsRef<Path>, files: &[(&str, &str)]) -> Result<()> {
    for (name, content) in files {
        let path = dir.as_ref().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

fn cli() -> Result<Command> {
    let mut cmd = Command::cargo_bin("treescout-cli")?;
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_prints_tree_with_totals() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("a.txt", "hello world\ngoodbye world\n"),
            ("b.log", "hello\n"),
            ("sub/c.txt", "say hello\n"),
        ],
    )?;

    cli()?
        .args(["-d", dir.path().to_str().unwrap(), "-s", "hello", "-e", ".txt", "-w"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total matches : 2"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("c.txt"))
        .stdout(predicate::str::contains("sub"))
        .stdout(predicate::str::contains("hello 1"))
        .stdout(predicate::str::contains("b.log").not());
    Ok(())
}

#[test]
fn test_no_matches() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "nothing to see\n")])?;

    cli()?
        .args(["-d", dir.path().to_str().unwrap(), "-s", "needle", "-e", "txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("src/main.go", "func Needle() {}\n"),
            ("vendor/dep.go", "needle\n"),
            ("notes.md", "needle\n"),
        ],
    )?;

    let config_dir = tempdir()?;
    let config_path = config_dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{
            "exclude_directories": ["vendor"],
            "allowed_extensions": [".go"],
            "match_case": false,
            "match_full_word": false
        }"#,
    )?;

    cli()?
        .args([
            "-d",
            dir.path().to_str().unwrap(),
            "-s",
            "needle",
            "-c",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total matches : 1"))
        .stdout(predicate::str::contains("main.go"))
        .stdout(predicate::str::contains("Needle()"))
        .stdout(predicate::str::contains("dep.go").not())
        .stdout(predicate::str::contains("notes.md").not());
    Ok(())
}

#[test]
fn test_stats_output() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[("a.txt", "TODO one\nTODO two\n"), ("b.txt", "TODO three\n")],
    )?;

    cli()?
        .args(["-d", dir.path().to_str().unwrap(), "-s", "TODO", "-e", ".txt", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 matches in 2 files"));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "cat cat dog\n")])?;

    let output = cli()?
        .args([
            "-d",
            dir.path().to_str().unwrap(),
            "-s",
            "cat",
            "-e",
            ".txt",
            "--match-case",
            "--full-word",
            "--json",
        ])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let matches = &json["root"]["files"][0]["matches"];
    assert_eq!(matches.as_array().map(Vec::len), Some(2));
    assert_eq!(matches[0]["line"], 1);
    assert_eq!(matches[0]["text"], "cat");
    assert_eq!(json["skipped"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[test]
fn test_empty_search_text_fails() -> Result<()> {
    let dir = tempdir()?;

    cli()?
        .args(["-d", dir.path().to_str().unwrap(), "-s", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provide a valid folder and search text"));
    Ok(())
}

#[test]
fn test_missing_arguments() -> Result<()> {
    cli()?.assert().failure();
    Ok(())
}

#[test]
fn test_fail_fast_on_missing_root() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing");

    cli()?
        .args(["-d", missing.to_str().unwrap(), "-s", "x", "--fail-fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read directory"));

    cli()?
        .args(["-d", missing.to_str().unwrap(), "-s", "x"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped"))
        .stdout(predicate::str::contains("No matches found"));
    Ok(())
}
