//! End-to-end tests for the `keytime` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_CSV: &str = "\u{feff}\"시작 시간\",\"종료 시간\",\"카테고리\",\"소요 시간(초)\"\n\
\"2024-06-03T09:00:00.000Z\",\"2024-06-03T09:25:00.000Z\",\"Work\",\"1500\"\n\
\"2024-06-03T10:00:00.000Z\",\"2024-06-03T10:10:00.000Z\",\"Reading\",\"600\"\n\
\"not a time\",\"2024-06-03T10:10:00.000Z\",\"Broken\",\"1\"\n";

fn keytime(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("keytime").unwrap();
    cmd.env("KEYTIME_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn json(home: &Path, args: &[&str]) -> serde_json::Value {
    let output = keytime(home).args(args).args(["-o", "json"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_shortcut_add_and_list() {
    let home = TempDir::new().unwrap();

    keytime(home.path())
        .args(["shortcut", "add", "w", "Work", "--timer", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work"));
    keytime(home.path())
        .args(["shortcut", "add", "r", "Reading"])
        .assert()
        .success();

    keytime(home.path())
        .args(["shortcut", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading"))
        .stdout(predicate::str::contains("25"));

    let value = json(home.path(), &["shortcut", "list"]);
    assert_eq!(value["count"], 2);
}

#[test]
fn test_space_is_not_a_shortcut() {
    let home = TempDir::new().unwrap();
    keytime(home.path())
        .args(["shortcut", "add", " ", "Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));

    let value = json(home.path(), &["shortcut", "list"]);
    assert_eq!(value["count"], 0);
}

#[test]
fn test_import_export_round_trip() {
    let home = TempDir::new().unwrap();
    let sample = home.path().join("sample.csv");
    fs::write(&sample, SAMPLE_CSV).unwrap();

    let imported = json(home.path(), &["import", sample.to_str().unwrap(), "--yes"]);
    assert_eq!(imported["accepted"], 2);
    assert_eq!(imported["skipped"], 1);

    let exported_path = home.path().join("out").join("sessions.csv");
    let exported = json(home.path(), &["export", "--out", exported_path.to_str().unwrap()]);
    assert_eq!(exported["count"], 2);

    let text = fs::read_to_string(&exported_path).unwrap();
    assert!(text.starts_with('\u{feff}'));
    assert!(text.contains("\"Reading\""));

    json(home.path(), &["import", exported_path.to_str().unwrap(), "--yes"]);
    let log = json(home.path(), &["log"]);
    assert_eq!(log["count"], 4);
}

#[test]
fn test_stats_for_a_past_day() {
    let home = TempDir::new().unwrap();
    let sample = home.path().join("sample.csv");
    fs::write(&sample, SAMPLE_CSV).unwrap();
    json(home.path(), &["import", sample.to_str().unwrap(), "--yes"]);

    keytime(home.path())
        .args(["stats", "--day", "2024-06-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work"));

    keytime(home.path())
        .args(["stats", "--day", "someday"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_clear_with_yes() {
    let home = TempDir::new().unwrap();
    let sample = home.path().join("sample.csv");
    fs::write(&sample, SAMPLE_CSV).unwrap();
    json(home.path(), &["import", sample.to_str().unwrap(), "--yes"]);

    let cleared = json(home.path(), &["clear", "--yes"]);
    assert_eq!(cleared["count"], 2);
    assert_eq!(json(home.path(), &["log"])["count"], 0);
}

#[test]
fn test_share_link_round_trip() {
    let source = TempDir::new().unwrap();
    keytime(source.path())
        .args(["shortcut", "add", "w", "Work", "--timer", "25"])
        .assert()
        .success();
    let link = json(source.path(), &["share"])["url"].as_str().unwrap().to_string();
    assert!(link.contains("shortcuts="));

    let target = TempDir::new().unwrap();
    let applied = json(target.path(), &["share", "apply", &link]);
    assert_eq!(applied["applied"], true);
    assert_eq!(json(target.path(), &["shortcut", "list"])["count"], 1);
}

#[test]
fn test_malformed_share_link_is_ignored() {
    let home = TempDir::new().unwrap();
    keytime(home.path())
        .args(["shortcut", "add", "w", "Work"])
        .assert()
        .success();

    let applied = json(home.path(), &["share", "apply", "https://keytime.app/?shortcuts=%%%"]);
    assert_eq!(applied["applied"], false);
    assert_eq!(json(home.path(), &["shortcut", "list"])["count"], 1);
}

#[test]
fn test_settings_persist() {
    let home = TempDir::new().unwrap();
    json(home.path(), &["settings", "--play-sound", "false", "--theme", "light"]);

    let value = json(home.path(), &["settings"]);
    assert_eq!(value["play_sound"], false);
    assert_eq!(value["theme"], "light");
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    keytime(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keytime"));
}
