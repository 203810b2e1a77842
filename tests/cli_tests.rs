use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from any config files on the host
fn stoker(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stoker").unwrap();
    cmd.current_dir(home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("STOKER_LOG");
    cmd
}

fn tree_pair() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for side in ["left", "right"] {
        let root = tmp.path().join(side);
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a.txt"), "hi").unwrap();
    }
    tmp
}

#[test]
fn test_help_output() {
    let tmp = TempDir::new().unwrap();
    stoker(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Directory tree comparison and accessibility audit tool",
        ))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("check_access"))
        .stdout(predicate::str::contains("find"));
}

#[test]
fn test_version_output() {
    let tmp = TempDir::new().unwrap();
    stoker(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_compare_identical_trees() {
    let tmp = tree_pair();
    stoker(tmp.path())
        .args(["compare", "left", "right"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Total paths: 2"))
        .stdout(predicate::str::contains("Identical"));
}

#[test]
fn test_compare_reports_extra_file() {
    let tmp = tree_pair();
    fs::write(tmp.path().join("right/c.txt"), "x").unwrap();

    stoker(tmp.path())
        .args(["compare", "left", "right"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing_in_left   c.txt"))
        .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn test_compare_all_lists_matches() {
    let tmp = tree_pair();
    stoker(tmp.path())
        .args(["compare", "--all", "left", "right"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("match             a.txt"))
        .stdout(predicate::str::contains("match             b"));
}

#[test]
fn test_compare_output_is_reproducible() {
    let tmp = tree_pair();
    fs::write(tmp.path().join("left/a.txt"), "ho").unwrap();
    fs::write(tmp.path().join("right/z"), "1").unwrap();

    let run = || {
        stoker(tmp.path())
            .args(["compare", "--all", "left", "right"])
            .output()
            .unwrap()
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn test_compare_json() {
    let tmp = tree_pair();
    fs::write(tmp.path().join("right/a.txt"), "ho").unwrap();

    let output = stoker(tmp.path())
        .args(["--format", "json", "compare", "left", "right"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["results"][0]["path"], "a.txt");
    assert_eq!(doc["results"][0]["classification"], "content_mismatch");
    assert_eq!(doc["summary"]["content_mismatch"], 1);
}

#[test]
fn test_compare_missing_root_is_fatal() {
    let tmp = tree_pair();
    stoker(tmp.path())
        .args(["compare", "left", "nowhere"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no such file or directory"));
}

#[test]
fn test_compare_ignore_flag() {
    let tmp = tree_pair();
    fs::write(tmp.path().join("right/scratch.tmp"), "x").unwrap();

    stoker(tmp.path())
        .args(["--ignore", "*.tmp", "compare", "left", "right"])
        .assert()
        .code(0);
}

#[test]
fn test_compare_reads_project_config() {
    let tmp = tree_pair();
    fs::write(tmp.path().join("right/scratch.tmp"), "x").unwrap();
    fs::write(tmp.path().join(".stoker.toml"), "ignore = [\"*.tmp\"]\n").unwrap();

    stoker(tmp.path())
        .args(["compare", "left", "right"])
        .assert()
        .code(0);

    stoker(tmp.path())
        .args(["--no-config", "compare", "left", "right"])
        .assert()
        .code(1);
}

#[test]
fn test_bad_config_is_fatal() {
    let tmp = tree_pair();
    fs::write(tmp.path().join("bad.toml"), "no_such_key = 1\n").unwrap();

    stoker(tmp.path())
        .args(["--config", "bad.toml", "compare", "left", "right"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.toml"));
}

#[test]
fn test_check_access_clean_tree() {
    let tmp = tree_pair();
    stoker(tmp.path())
        .args(["check_access", "left"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("0 inaccessible objects"));
}

#[test]
#[cfg(unix)]
fn test_check_access_broken_symlink() {
    let tmp = tree_pair();
    std::os::unix::fs::symlink("gone", tmp.path().join("left/dangling")).unwrap();

    stoker(tmp.path())
        .args(["check-access", "left"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("dangling\tbroken_symlink"))
        .stdout(predicate::str::contains("1 inaccessible objects"));
}

#[test]
fn test_find_by_extension() {
    let tmp = TempDir::new().unwrap();
    let run = tmp.path().join("run");
    fs::create_dir(&run).unwrap();
    fs::write(run.join("x.fastq"), "").unwrap();
    fs::write(run.join("x.fastq.gz"), "").unwrap();
    fs::write(run.join("x.bam"), "").unwrap();

    stoker(tmp.path())
        .args(["find", "run", "-e", "fastq"])
        .assert()
        .code(0)
        .stdout("x.fastq\nx.fastq.gz\n2 matching objects\n");

    stoker(tmp.path())
        .args(["find", "run", "-e", ".fastq", "--no-compressed"])
        .assert()
        .code(0)
        .stdout("x.fastq\n1 matching objects\n");
}

#[test]
fn test_find_full_paths() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("x.bam"), "").unwrap();
    let root = dunce::canonicalize(tmp.path()).unwrap();

    stoker(tmp.path())
        .args(["find", ".", "-e", "bam", "--full-paths"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            root.join("x.bam").display().to_string(),
        ));
}

#[test]
fn test_unknown_subcommand() {
    let tmp = TempDir::new().unwrap();
    stoker(tmp.path()).arg("sync").assert().failure().code(2);
}
