//! Stamps `TALLY_BUILD_SHA` into the binary for `tally --version`.

use std::path::Path;
use std::process::Command;

fn git(repo: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(repo).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest_dir).join("..");

    let sha = std::env::var("TALLY_BUILD_SHA")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| git(&workspace, &["describe", "--always", "--dirty", "--abbrev=8"]))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=TALLY_BUILD_SHA={sha}");
    println!("cargo:rerun-if-env-changed=TALLY_BUILD_SHA");
    if let Some(head) = git(&workspace, &["rev-parse", "--git-path", "HEAD"]) {
        println!("cargo:rerun-if-changed={}", workspace.join(head).display());
    }
}
