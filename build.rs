// Embeds the git commit, branch, and build timestamp so the startup banner
// can report exactly what is running. When git is unavailable (Docker image
// builds, source tarballs) the values come from version.toml instead.

use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    let (fallback_commit, fallback_branch) = version_toml_fallback(Path::new("version.toml"));

    let commit =
        git_output(&["rev-parse", "--short", "HEAD"]).unwrap_or(fallback_commit);
    let branch =
        git_output(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or(fallback_branch);
    let built = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", commit);
    println!("cargo:rustc-env=GIT_BRANCH={}", branch);
    println!("cargo:rustc-env=BUILD_DATE={}", built);

    // New commits and fallback edits should both retrigger this script.
    for trigger in [".git/HEAD", "version.toml"] {
        if Path::new(trigger).exists() {
            println!("cargo:rerun-if-changed={}", trigger);
        }
    }
}

/// Trimmed stdout of one git invocation, or None when git is absent, the
/// command fails, or it prints nothing.
fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `(commit, branch)` recorded in version.toml; "unknown" where absent.
fn version_toml_fallback(path: &Path) -> (String, String) {
    let mut commit = String::from("unknown");
    let mut branch = String::from("unknown");

    if let Ok(content) = fs::read_to_string(path) {
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            if value.is_empty() || value == "unknown" {
                continue;
            }
            match key.trim() {
                "git_commit_hash" => commit = value.to_string(),
                "git_branch" => branch = value.to_string(),
                _ => {}
            }
        }
    }

    (commit, branch)
}
