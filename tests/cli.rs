use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Command with a clean environment rooted at `home`
fn cachef(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cachef"));
    cmd.env_remove("XDG_CACHE_HOME")
        .env_remove("CACHEF_STORE")
        .env_remove("RUST_LOG")
        .env("HOME", home);
    cmd
}

fn default_cache_file(home: &Path) -> PathBuf {
    home.join("cachef").join("cachef.txt")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn cache_file_flag_prints_home_location() {
    let temp = tempdir().unwrap();
    let expected = default_cache_file(temp.path());

    cachef(temp.path())
        .arg("--cache-file")
        .assert()
        .success()
        .stdout(format!("{}\n", expected.display()));

    assert!(!expected.exists());
}

#[test]
fn cache_file_flag_prefers_xdg_cache_home() {
    let temp = tempdir().unwrap();
    let xdg = temp.path().join("xdg");

    cachef(temp.path())
        .env("XDG_CACHE_HOME", &xdg)
        .arg("--cache-file")
        .assert()
        .success()
        .stdout(format!("{}\n", default_cache_file(&xdg).display()));
}

#[test]
fn empty_xdg_cache_home_falls_back_to_home() {
    let temp = tempdir().unwrap();

    cachef(temp.path())
        .env("XDG_CACHE_HOME", "")
        .arg("--cache-file")
        .assert()
        .success()
        .stdout(format!("{}\n", default_cache_file(temp.path()).display()));
}

#[test]
fn insert_from_project_directory_writes_canonical_line() {
    let temp = tempdir().unwrap();
    let home = temp.path().canonicalize().unwrap();
    let project = home.join("proj");
    write_file(&project.join("README.md"), "# readme\n");

    cachef(&home)
        .current_dir(&project)
        .arg("README.md")
        .assert()
        .success();

    let content = fs::read_to_string(default_cache_file(&home)).unwrap();
    assert_eq!(content, format!("{}\n", project.join("README.md").display()));
}

#[test]
fn repeated_insert_keeps_one_line() {
    let temp = tempdir().unwrap();
    let home = temp.path().canonicalize().unwrap();
    let project = home.join("proj");
    write_file(&project.join("a"), "a");

    cachef(&home)
        .current_dir(&project)
        .arg("./a")
        .assert()
        .success();
    cachef(&home)
        .current_dir(&project)
        .arg(project.join("a"))
        .assert()
        .success();

    let content = fs::read_to_string(default_cache_file(&home)).unwrap();
    assert_eq!(content, format!("{}\n", project.join("a").display()));
}

#[test]
fn single_batch_may_append_equivalent_paths_twice() {
    let temp = tempdir().unwrap();
    let home = temp.path().canonicalize().unwrap();
    let project = home.join("proj");
    write_file(&project.join("a"), "a");

    cachef(&home)
        .current_dir(&project)
        .arg("./a")
        .arg(project.join("a"))
        .assert()
        .success();

    let content = fs::read_to_string(default_cache_file(&home)).unwrap();
    let line = project.join("a").display().to_string();
    assert_eq!(content, format!("{}\n{}\n", line, line));
}

#[test]
fn no_arguments_is_a_noop() {
    let temp = tempdir().unwrap();

    cachef(temp.path()).assert().success().stdout("");

    assert!(!default_cache_file(temp.path()).exists());
}

#[test]
fn clean_without_cache_file_exits_one() {
    let temp = tempdir().unwrap();

    cachef(temp.path())
        .arg("--clean")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cache file is not found."));

    assert!(!default_cache_file(temp.path()).exists());
}

#[test]
fn clean_drops_deleted_paths_in_order() {
    let temp = tempdir().unwrap();
    let home = temp.path().canonicalize().unwrap();
    let a = home.join("files/a");
    let b = home.join("files/b");
    let c = home.join("files/c");
    for path in [&a, &b, &c] {
        write_file(path, "x");
    }

    cachef(&home).arg(&a).arg(&b).arg(&c).assert().success();
    fs::remove_file(&b).unwrap();

    cachef(&home).arg("--clean").assert().success();

    let content = fs::read_to_string(default_cache_file(&home)).unwrap();
    assert_eq!(content, format!("{}\n{}\n", a.display(), c.display()));
}

#[test]
fn store_option_overrides_default_location() {
    let temp = tempdir().unwrap();
    let home = temp.path().canonicalize().unwrap();
    let store = home.join("custom/list.txt");
    write_file(&home.join("a"), "a");

    cachef(&home)
        .arg("--store")
        .arg(&store)
        .arg(home.join("a"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&store).unwrap(),
        format!("{}\n", home.join("a").display())
    );
    assert!(!default_cache_file(&home).exists());

    cachef(&home)
        .env("CACHEF_STORE", &store)
        .arg("--cache-file")
        .assert()
        .success()
        .stdout(format!("{}\n", store.display()));
}

#[test]
fn help_mentions_clean() {
    let temp = tempdir().unwrap();

    cachef(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--clean"));
}
