//! Captures the git version at compile time for `marcfix --version`.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let package = env!("CARGO_PKG_VERSION");
    let version = match git_describe() {
        // A bare commit hash means no tag is reachable.
        Some(describe) if !describe.contains('.') => format!("{package}+{describe}"),
        Some(describe) => describe,
        None => package.to_string(),
    };

    println!("cargo:rustc-env=MARCFIX_VERSION={version}");
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let describe = String::from_utf8(output.stdout).ok()?;
    let describe = describe.trim();
    let describe = describe.strip_prefix('v').unwrap_or(describe);

    (!describe.is_empty()).then(|| describe.to_string())
}
