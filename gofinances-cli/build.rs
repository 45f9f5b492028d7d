use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "GOFINANCES_BUILD_SHA";

/// Runs git in the workspace root, `None` on any failure or empty output
fn git(workspace: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").current_dir(workspace).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest_dir).join("..");

    // a preset value wins, for builds outside a git checkout
    let sha = match std::env::var(SHA_VAR) {
        Ok(preset) if !preset.trim().is_empty() => preset.trim().to_string(),
        _ => match git(&workspace, &["rev-parse", "--short=10", "HEAD"]) {
            Some(sha) if !sha.is_empty() => {
                let dirty = git(&workspace, &["status", "--porcelain", "--untracked-files=no"])
                    .is_some_and(|status| !status.is_empty());
                if dirty { format!("{sha}-dirty") } else { sha }
            }
            _ => "unknown".to_string(),
        },
    };

    println!("cargo:rustc-env={SHA_VAR}={sha}");
    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
