use assert_cmd::Command; // Bring Command into scope
use predicates::prelude::*; // Bring predicate traits into scope
use serde_json::json;

/// Write a minimal mod directory under `root` and return its id.
fn write_mod(root: &std::path::Path, id: &str, dependencies: &[&str]) {
    let unit_dir = root.join(id);
    std::fs::create_dir_all(&unit_dir).unwrap();
    let descriptor = json!({
        "id": id,
        "name": id,
        "version": "1.0.0",
        "host_version": "1.0.0",
        "content": "ASSETS",
        "dependencies": dependencies,
    });
    std::fs::write(
        unit_dir.join("mod.json"),
        serde_json::to_string_pretty(&descriptor).unwrap(),
    )
    .unwrap();
    std::fs::write(unit_dir.join(format!("{}.assets", id)), b"blob").unwrap();
}

#[test]
fn test_list_shows_discovered_mods() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    write_mod(root.path(), "alpha", &[]);
    write_mod(root.path(), "beta", &[]);

    let mut cmd = Command::cargo_bin("lodestone")?;
    cmd.arg("--root").arg(root.path()).arg("list");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Discovered 2 mod(s)"))
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"))
        .stdout(predicate::str::contains("[ready]"));

    Ok(())
}

#[test]
fn test_check_reports_missing_dependency() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    write_mod(root.path(), "alpha", &["ghost"]);

    let mut cmd = Command::cargo_bin("lodestone")?;
    cmd.arg("--root").arg(root.path()).arg("check").arg("alpha");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("can_load = false"))
        .stdout(predicate::str::contains("missing dependency: ghost"));

    Ok(())
}

#[test]
fn test_load_drives_mod_to_loaded() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    write_mod(root.path(), "alpha", &[]);

    let mut cmd = Command::cargo_bin("lodestone")?;
    cmd.arg("--root").arg(root.path()).arg("load").arg("alpha");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("alpha loaded"));

    Ok(())
}

#[test]
fn test_disable_persists_to_descriptor() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    write_mod(root.path(), "alpha", &[]);

    let mut cmd = Command::cargo_bin("lodestone")?;
    cmd.arg("--root")
        .arg(root.path())
        .arg("disable")
        .arg("alpha");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("alpha disabled"));

    let raw = std::fs::read_to_string(root.path().join("alpha").join("mod.json"))?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(parsed["enabled"], serde_json::Value::Bool(false));

    Ok(())
}

#[test]
fn test_unknown_mod_fails() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;

    let mut cmd = Command::cargo_bin("lodestone")?;
    cmd.arg("--root").arg(root.path()).arg("check").arg("ghost");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("unknown mod: ghost"));

    Ok(())
}
