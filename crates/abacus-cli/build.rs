//! Sets `ABACUS_VERSION` for `abacus --version`.
//!
//! Packagers can pin the string with `ABACUS_VERSION_OVERRIDE`. Otherwise a
//! git checkout reports `git describe`, and a source tarball falls back to
//! the crate version.

use std::env;
use std::path::Path;
use std::process::Command;

const OVERRIDE: &str = "ABACUS_VERSION_OVERRIDE";

fn main() {
    println!("cargo:rerun-if-env-changed={OVERRIDE}");

    let git_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../.git");
    if git_dir.exists() {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());
    }

    let version = env::var(OVERRIDE)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(describe)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=ABACUS_VERSION={version}");
}

/// `git describe` output without a leading `v`, or `None` outside a checkout.
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    match described.trim() {
        "" => None,
        v => Some(v.trim_start_matches('v').to_string()),
    }
}
