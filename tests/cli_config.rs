use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn bin(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pkgbridge"));
    cmd.env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env_remove("PKGBRIDGE_CONFIG")
        .env_remove("PKGBRIDGE_WORK_DIR")
        .env_remove("PKGBRIDGE_PACKAGE_CACHE_DIR")
        .env_remove("PKGBRIDGE_INSTALLED_MAP")
        .env_remove("PKGBRIDGE_LOCK_FILE")
        .env_remove("PKGBRIDGE_REMOVE_WORK_DIRS")
        .env_remove("PKGBRIDGE_REMOVE_BUILT_PACKAGES")
        .arg("--color")
        .arg("never");
    cmd
}

#[test]
fn config_show_prints_defaults_as_toml() {
    let home = tempdir().unwrap();
    let output = bin(home.path()).args(["config", "show"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[paths]"));
    assert!(stdout.contains("[registry]"));
    assert!(stdout.contains("repo_name"));
}

#[test]
fn config_without_action_shows() {
    let home = tempdir().unwrap();
    let output = bin(home.path()).arg("config").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[retention]"));
}

#[test]
fn config_show_json_is_valid_json() {
    let home = tempdir().unwrap();
    let output = bin(home.path())
        .args(["--json", "config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.get("registry").is_some());
    assert!(value.get("paths").is_some());
}

#[test]
fn config_path_defaults_to_xdg_location() {
    let home = tempdir().unwrap();
    let output = bin(home.path()).args(["config", "path"]).output().unwrap();

    assert!(output.status.success());
    let expected = home.path().join("pkgbridge/config.toml");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        expected.display().to_string()
    );
}

#[test]
fn config_path_honours_environment() {
    let home = tempdir().unwrap();
    let file = home.path().join("elsewhere.toml");
    let output = bin(home.path())
        .env("PKGBRIDGE_CONFIG", &file)
        .args(["config", "path"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        file.display().to_string()
    );
}

#[test]
fn config_file_values_and_env_overrides_apply() {
    let home = tempdir().unwrap();
    let file = home.path().join("config.toml");
    fs::write(
        &file,
        "[registry]\nrepo_name = \"community\"\n\n[paths]\nwork_dir = \"/from/file\"\n",
    )
    .unwrap();

    let output = bin(home.path())
        .env("PKGBRIDGE_WORK_DIR", "/from/env")
        .arg("--config")
        .arg(&file)
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("repo_name = \"community\""));
    assert!(stdout.contains("work_dir = \"/from/env\""));
    assert!(!stdout.contains("/from/file"));
}

#[test]
fn unknown_config_key_warns_with_suggestion() {
    let home = tempdir().unwrap();
    let file = home.path().join("config.toml");
    fs::write(&file, "[paths]\nwork_dri = \"/w\"\n").unwrap();

    let output = bin(home.path())
        .env("PKGBRIDGE_CONFIG", &file)
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown config key 'work_dri'"));
    assert!(stderr.contains("did you mean 'work_dir'?"));
}

#[test]
fn malformed_config_fails() {
    let home = tempdir().unwrap();
    let file = home.path().join("config.toml");
    fs::write(&file, "[paths\nwork_dir = ").unwrap();

    let output = bin(home.path())
        .arg("--config")
        .arg(&file)
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid configuration"));
}
