//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// journl with config and data dirs isolated under `home`
fn journl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("journl").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("JOURNL_REMOTE_KEY")
        .env_remove("JOURNL_LOG");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("attach"))
        .stdout(predicate::str::contains("link"))
        .stdout(predicate::str::contains("media"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("journl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn record_help_lists_options() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .args(["record", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-duration"))
        .stdout(predicate::str::contains("--storage"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("journl"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .args(["config", "set", "waveform_bars", "32"])
        .assert()
        .success();
    journl(&home)
        .args(["config", "get", "waveform_bars"])
        .assert()
        .success()
        .stdout(predicate::str::diff("32\n"));
}

#[test]
fn config_api_key_is_masked() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .args(["config", "set", "remote.api_key", "abcdefghijklmnop"])
        .assert()
        .success();
    journl(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd...mnop"))
        .stdout(predicate::str::contains("abcdefghijklmnop").not());
}

#[test]
fn link_prints_media_item_json() {
    let home = TempDir::new().unwrap();
    let output = journl(&home)
        .args(["link", "www.rust-lang.org/learn"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let item: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(item["type"], "link");
    assert_eq!(item["name"], "Link to rust-lang.org");
    assert_eq!(item["preview"]["url"], "https://www.rust-lang.org/learn");
    assert!(item.get("duration").is_none());
}

#[test]
fn attach_image_stores_in_media_dir() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("photo.png");
    std::fs::write(&image, b"not really a png").unwrap();

    let output = journl(&home)
        .arg("attach")
        .arg(&image)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let item: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(item["type"], "image");
    assert_eq!(item["name"], "photo.png");
    assert_eq!(item["size"], 16);

    let id = item["url"].as_str().unwrap().to_string();
    journl(&home)
        .args(["media", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("image/png"));
}

#[test]
fn media_path_uses_data_dir() {
    let home = TempDir::new().unwrap();
    journl(&home)
        .args(["media", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("journl"))
        .stdout(predicate::str::contains("media"));
}
