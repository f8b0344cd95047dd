//! Build script for LinkUp
//!
//! Embeds git state, build timestamp, target and profile as `LINKUP_*`
//! compile-time environment variables.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_hash = run("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_branch = run("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    let git_dirty = match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(output) if output.status.success() => (!output.stdout.is_empty()).to_string(),
        _ => "unknown".to_string(),
    };

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let rustc_version = run("rustc", &["--version"]);

    println!("cargo:rustc-env=LINKUP_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=LINKUP_GIT_BRANCH={}", git_branch);
    println!("cargo:rustc-env=LINKUP_GIT_DIRTY={}", git_dirty);
    println!("cargo:rustc-env=LINKUP_BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=LINKUP_TARGET={}", target);
    println!("cargo:rustc-env=LINKUP_PROFILE={}", profile);
    println!("cargo:rustc-env=LINKUP_RUSTC_VERSION={}", rustc_version);
}

/// Trimmed stdout of a command, or "unknown" if it fails
fn run(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
