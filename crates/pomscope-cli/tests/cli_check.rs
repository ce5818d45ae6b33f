use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn pomscope_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pomscope").unwrap();
    cmd.env("HOME", home)
        .env_remove("POMSCOPE_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_check_parent_cycle_fails() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "a/pom.xml",
        "<project><parent><groupId>g</groupId><artifactId>b</artifactId><version>1</version></parent>\
         <groupId>g</groupId><artifactId>a</artifactId><version>1</version></project>",
    );
    write(
        tmp.path(),
        "b/pom.xml",
        "<project><parent><groupId>g</groupId><artifactId>a</artifactId><version>1</version></parent>\
         <groupId>g</groupId><artifactId>b</artifactId><version>1</version></project>",
    );

    pomscope_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "error: cyclic parent: g:a:1 -> g:b:1 -> g:a:1",
        ))
        .stderr(predicate::str::contains("1 parent cycle(s) found"));
}

#[test]
fn test_check_unresolved_placeholder_warns() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "pom.xml",
        "<project><groupId>g</groupId><artifactId>a</artifactId><version>${revision}</version></project>",
    );

    pomscope_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unresolved placeholder ${revision}"))
        .stdout(predicate::str::contains("project/version"));
}

#[test]
fn test_excluded_target_is_not_scanned() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "pom.xml",
        "<project><groupId>g</groupId><artifactId>a</artifactId><version>1</version></project>",
    );
    write(
        tmp.path(),
        "target/classes/META-INF/maven/g/a/pom.xml",
        "<project><groupId>g</groupId><artifactId>copy</artifactId><version>1</version></project>",
    );

    pomscope_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("g:a:1"))
        .stdout(predicate::str::contains("g:copy:1").not());
}

#[test]
fn test_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    pomscope_cmd(tmp.path())
        .arg("--root")
        .arg(tmp.path().join("absent"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_empty_tree() {
    let tmp = TempDir::new().unwrap();
    pomscope_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No POMs found"));
}
