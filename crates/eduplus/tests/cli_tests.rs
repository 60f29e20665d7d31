//! Integration tests for the eduplus-barcode command line
#![cfg(unix)]

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use eduplus_barcode::{HostEnv, PlatformKey, SystemHost};
use eduplus_testkit::{
    stub_failing, stub_recording_args, stub_writing_output, temp_dir_in_workspace,
    write_stub_binary,
};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

fn artifact() -> String {
    let host = SystemHost::new();
    PlatformKey::detect(&host.os_family(), &host.machine())
        .expect("tests run on a supported platform")
        .artifact_name()
}

/// Command with `--bin-dir` pointing at `root/bin` and HOME at `root/home`
fn command(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("eduplus-barcode"));
    cmd.env("HOME", root.join("home"))
        .env_remove("EDUPLUS_BARCODE_CONFIG")
        .arg("--bin-dir")
        .arg(root.join("bin"));
    cmd
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::new(cargo_bin!("eduplus-barcode"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_generate_writes_file() {
    let temp = temp_dir_in_workspace();
    write_stub_binary(
        &temp.path().join("bin"),
        &artifact(),
        &stub_writing_output("PNGDATA"),
    );
    let out = temp.path().join("code.png");

    command(temp.path())
        .args(["generate", "--text", "ABC123", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Barcode written to"));

    assert_eq!(fs::read_to_string(&out).unwrap(), "PNGDATA");
}

#[test]
fn test_generate_base64() {
    let temp = temp_dir_in_workspace();
    write_stub_binary(
        &temp.path().join("bin"),
        &artifact(),
        &stub_writing_output("hello"),
    );

    command(temp.path())
        .args(["generate", "-t", "ABC123", "-o"])
        .arg(temp.path().join("code.png"))
        .arg("--base64")
        .assert()
        .success()
        .stdout("aGVsbG8=\n");
}

#[test]
fn test_generate_failure_prints_renderer_output() {
    let temp = temp_dir_in_workspace();
    write_stub_binary(
        &temp.path().join("bin"),
        &artifact(),
        &stub_failing("boom", 1),
    );

    command(temp.path())
        .args(["generate", "-t", "ABC123", "-o"])
        .arg(temp.path().join("code.png"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("  - boom\n"))
        .stderr(predicate::str::contains("Error: Barcode generation failed"));
}

#[test]
fn test_generate_uses_settings_file() {
    let temp = temp_dir_in_workspace();
    let record = temp.path().join("args.txt");
    write_stub_binary(
        &temp.path().join("bin"),
        &artifact(),
        &stub_recording_args(&record, "x"),
    );
    let config = temp.path().join("eduplus-barcode.toml");
    fs::write(&config, "[job]\ntype = \"ean13\"\nwidth = 500\n").unwrap();

    command(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["generate", "-t", "4006381333931", "-o"])
        .arg(temp.path().join("code.png"))
        .arg("--height")
        .arg("80")
        .assert()
        .success();

    let args = fs::read_to_string(&record).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(&args[4..], &["-type", "ean13", "-w", "500", "-height", "80"]);
}

#[test]
fn test_generate_without_binary_fails() {
    let temp = temp_dir_in_workspace();

    command(temp.path())
        .args(["generate", "-t", "ABC123", "-o"])
        .arg(temp.path().join("code.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Binary not found or not executable for your platform",
        ))
        .stderr(predicate::str::contains("Binary not available"));
}

#[test]
fn test_resolve_json_reports_source() {
    let temp = temp_dir_in_workspace();
    write_stub_binary(&temp.path().join("bin"), &artifact(), "exit 0");

    let output = command(temp.path())
        .args(["resolve", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["artifact"], artifact());
    assert_eq!(report["resolved"]["source"], "bundled");
    assert!(report["error"].is_null());
}

#[test]
fn test_resolve_reports_attempts_on_failure() {
    let temp = temp_dir_in_workspace();

    command(temp.path())
        .arg("resolve")
        .arg("--disable")
        .arg("copy-file")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[bundled]"))
        .stdout(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("[install]"));
}

#[test]
fn test_unknown_capability_rejected() {
    let temp = temp_dir_in_workspace();

    command(temp.path())
        .args(["resolve", "--disable", "teleport"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown capability"));
}
