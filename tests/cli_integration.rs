//! CLI integration tests for cargo2ebuild.
//!
//! These tests run the binary against minimal Cargo packages and check
//! the generated ebuild text end to end.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the cargo2ebuild binary command.
fn cargo2ebuild() -> Command {
    Command::cargo_bin("cargo2ebuild").unwrap()
}

/// Create a temporary directory for test packages.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a minimal package with no external dependencies.
fn write_package(dir: &Path) {
    fs::write(
        dir.join("Cargo.toml"),
        r#"[package]
name = "mytool"
version = "0.1.0"
license = "MIT OR Apache-2.0"
description = "An example   tool"
homepage = "https://example.com/my tool"
"#,
    )
    .unwrap();
    fs::write(
        dir.join("Cargo.lock"),
        r#"version = 3

[[package]]
name = "mytool"
version = "0.1.0"
"#,
    )
    .unwrap();
}

/// Write a package with one registry dependency.
fn write_package_with_dep(dir: &Path) {
    write_package(dir);
    fs::write(
        dir.join("Cargo.lock"),
        r#"version = 3

[[package]]
name = "mytool"
version = "0.1.0"

[[package]]
name = "fastrand"
version = "2.1.0"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "9fc0510504f03c51ada170672ac806f1f105a88aa97a5281117e1ddc3368e51a"
"#,
    )
    .unwrap();
}

// ============================================================================
// render mode
// ============================================================================

#[test]
fn test_render_writes_ebuild() {
    let tmp = temp_dir();
    write_package(tmp.path());

    cargo2ebuild()
        .args(["--no-fetch", "."])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mytool-0.1.0.ebuild"));

    let ebuild = fs::read_to_string(tmp.path().join("mytool-0.1.0.ebuild")).unwrap();
    assert!(ebuild.contains("EAPI=8"));
    assert!(ebuild.contains("CRATES=\"\n\""));
    assert!(ebuild.contains("inherit cargo"));
    assert!(ebuild.contains("DESCRIPTION=\"An example tool\""));
    assert!(ebuild.contains("HOMEPAGE=\"https://example.com/my+tool\""));
    assert!(ebuild.contains("LICENSE=\"|| ( Apache-2.0 MIT )\""));
    assert!(ebuild.contains("# Dependent crate licenses\nLICENSE+=\"\""));
    assert!(ebuild.ends_with("SLOT=\"0\"\nKEYWORDS=\"~amd64\"\n"));
}

#[test]
fn test_render_with_dependency_and_override() {
    let tmp = temp_dir();
    write_package_with_dep(tmp.path());

    // The override keeps the tool from opening the (absent) archive.
    cargo2ebuild()
        .args(["--no-fetch", "-L", "fastrand=MIT", "."])
        .current_dir(tmp.path())
        .assert()
        .success();

    let ebuild = fs::read_to_string(tmp.path().join("mytool-0.1.0.ebuild")).unwrap();
    assert!(ebuild.contains("CRATES=\"\n\tfastrand@2.1.0\n\""));
    assert!(ebuild.contains("LICENSE+=\" MIT\""));
}

#[test]
fn test_render_without_crate_license_block() {
    let tmp = temp_dir();
    write_package(tmp.path());

    cargo2ebuild()
        .args(["--no-fetch", "--no-license", "."])
        .current_dir(tmp.path())
        .assert()
        .success();

    let ebuild = fs::read_to_string(tmp.path().join("mytool-0.1.0.ebuild")).unwrap();
    assert!(!ebuild.contains("LICENSE+="));
}

#[test]
fn test_render_fails_without_lockfile() {
    let tmp = temp_dir();
    write_package(tmp.path());
    fs::remove_file(tmp.path().join("Cargo.lock")).unwrap();

    cargo2ebuild()
        .args(["--no-fetch", "."])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cargo.lock"));
}

// ============================================================================
// update mode
// ============================================================================

#[test]
fn test_update_is_idempotent() {
    let tmp = temp_dir();
    write_package(tmp.path());

    cargo2ebuild()
        .args(["--no-fetch", "."])
        .current_dir(tmp.path())
        .assert()
        .success();

    let path = tmp.path().join("mytool-0.1.0.ebuild");
    let rendered = fs::read_to_string(&path).unwrap();

    cargo2ebuild()
        .args(["--no-fetch", "-i", "mytool-0.1.0.ebuild", "."])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), rendered);
}

#[test]
fn test_update_refreshes_crates_value() {
    let tmp = temp_dir();
    write_package(tmp.path());

    cargo2ebuild()
        .args(["--no-fetch", "."])
        .current_dir(tmp.path())
        .assert()
        .success();

    // A new dependency appears in the lockfile.
    write_package_with_dep(tmp.path());

    cargo2ebuild()
        .args([
            "--no-fetch",
            "-L",
            "fastrand=MIT",
            "-i",
            "mytool-0.1.0.ebuild",
            ".",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let ebuild = fs::read_to_string(tmp.path().join("mytool-0.1.0.ebuild")).unwrap();
    assert!(ebuild.contains("CRATES=\"\n\tfastrand@2.1.0\n\""));
    assert!(ebuild.contains("LICENSE+=\" MIT\""));
    // The package LICENSE was left untouched.
    assert!(ebuild.contains("LICENSE=\"|| ( Apache-2.0 MIT )\""));
}

#[test]
fn test_update_rejects_document_without_crates() {
    let tmp = temp_dir();
    write_package(tmp.path());
    fs::write(tmp.path().join("broken.ebuild"), "EAPI=8\nSLOT=\"0\"\n").unwrap();

    cargo2ebuild()
        .args(["--no-fetch", "-i", "broken.ebuild", "."])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("CRATES= matched 0 times, 1 expected"));
}

// ============================================================================
// vendored tarball mode
// ============================================================================

#[test]
fn test_crate_tarball_replaces_crate_list() {
    let tmp = temp_dir();
    write_package_with_dep(tmp.path());

    cargo2ebuild()
        .args([
            "--no-fetch",
            "-L",
            "fastrand=MIT",
            "--crate-tarball",
            "mytool-0.1.0-crates.tar.xz",
            ".",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let ebuild = fs::read_to_string(tmp.path().join("mytool-0.1.0.ebuild")).unwrap();
    assert!(ebuild.contains("CRATES=\"\n\""));
    assert!(!ebuild.contains("fastrand@"));
    assert!(ebuild.contains("if [[ ${PKGBUMPING} != ${PVR} ]]; then"));
    assert!(ebuild.contains("mytool-0.1.0-crates.tar.xz"));
}
