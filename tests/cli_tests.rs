//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SCHEMA: &str = r#"
[elective]
name = "spellbook"
description = "A spell checker."
combine = "left"
order = ["default", "toml", "env", "cli"]

[elective.options.spell-check]
type = "boolean_group"
default = false
short_pos = "c"
short_neg = "C"
help = "Check spelling."

[elective.options.width]
type = "int"
default = 72

[elective.options.license]
type = "display"
default = """
    Copyright 2021 Someone.

    Permission is granted.
"""
"#;

fn setup() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("temp dir");
    let schema = tmp.path().join("spellbook.toml");
    fs::write(&schema, SCHEMA).expect("write schema");
    (tmp, schema)
}

fn elective() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("elective"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    elective()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_resolve_prints_defaults() {
    let (tmp, schema) = setup();
    elective()
        .args(["resolve", schema.to_str().expect("utf8 path"), "-d"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"spell-check\": false"))
        .stdout(predicate::str::contains("\"width\": 72"));
}

#[test]
fn test_resolve_layers_file_env_and_flags() {
    let (tmp, schema) = setup();
    fs::write(tmp.path().join(".spellbook.toml"), "width = 80\n").expect("write config");

    elective()
        .env("ELECTIVE_SPELLBOOK_WIDTH", "100")
        .args(["resolve", schema.to_str().expect("utf8 path"), "--provenance", "-d"])
        .arg(tmp.path())
        .args(["--", "-c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": 100"))
        .stdout(predicate::str::contains("\"source\": \"env\""))
        .stdout(predicate::str::contains("\"source\": \"toml\""))
        .stdout(predicate::str::contains("\"source\": \"cli\""));
}

#[test]
fn test_resolve_env_format() {
    let (tmp, schema) = setup();
    elective()
        .args(["resolve", schema.to_str().expect("utf8 path"), "--format", "env", "-d"])
        .arg(tmp.path())
        .args(["--", "-C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export ELECTIVE_SPELLBOOK_SPELL_CHECK='false'"))
        .stdout(predicate::str::contains("export ELECTIVE_SPELLBOOK_WIDTH='72'"));
}

#[test]
fn test_display_option_prints_and_exits_zero() {
    let (tmp, schema) = setup();
    elective()
        .args(["resolve", schema.to_str().expect("utf8 path"), "-d"])
        .arg(tmp.path())
        .args(["--", "--license"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Copyright 2021 Someone.\n\nPermission is granted.\n"));
}

#[test]
fn test_bad_client_flag_exits_with_usage_error() {
    let (tmp, schema) = setup();
    elective()
        .args(["resolve", schema.to_str().expect("utf8 path"), "-d"])
        .arg(tmp.path())
        .args(["--", "--yourface"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yourface"));
}

#[test]
fn test_invalid_combine_fails() {
    let tmp = TempDir::new().expect("temp dir");
    let schema = tmp.path().join("bad.toml");
    fs::write(&schema, "[elective]\nname = \"bad\"\ncombine = \"yourface\"\n").expect("write schema");

    elective()
        .args(["resolve", schema.to_str().expect("utf8 path")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("yourface"));
}

#[test]
fn test_env_conflict_fails() {
    let (tmp, schema) = setup();
    elective()
        .env("ELECTIVE_SPELLBOOK_WIDTH", "1")
        .env("ELECTIVE_SPELLBOOK_WIDTH__0", "2")
        .args(["resolve", schema.to_str().expect("utf8 path"), "-d"])
        .arg(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("defined multiple times"));
}

#[test]
fn test_info_describes_schema() {
    let (_tmp, schema) = setup();
    elective()
        .args(["info", schema.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Program: spellbook"))
        .stdout(predicate::str::contains("Combine: left"))
        .stdout(predicate::str::contains("Environment prefix: ELECTIVE_SPELLBOOK_"))
        .stdout(predicate::str::contains("spell-check (boolean_group) default=false"));
}

#[test]
fn test_clashing_client_flags_fail() {
    let tmp = TempDir::new().expect("temp dir");
    let schema = tmp.path().join("clash.toml");
    fs::write(
        &schema,
        "[elective]\nname = \"clash\"\n\
         [elective.options.one]\ntype = \"boolean\"\nshort_pos = \"x\"\n\
         [elective.options.two]\ntype = \"boolean\"\nshort_pos = \"x\"\n",
    )
    .expect("write schema");

    elective()
        .args(["resolve", schema.to_str().expect("utf8 path")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("flag `-x` is used by both `one` and `two`"));
}
