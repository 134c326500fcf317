use std::{env, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = run("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let status = match run("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".into());
    let rustc = run("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());

    for (key, value) in [
        ("HASH", hash.as_str()),
        ("STATUS", status),
        ("TIMESTAMP", timestamp.as_str()),
        ("TARGET", target.as_str()),
        ("PROFILE", profile.as_str()),
        ("RUSTC", rustc.as_str()),
    ] {
        println!("cargo:rustc-env=BILL_REMINDERS_BUILD_{key}={value}");
    }
}

/// Trimmed stdout of a successful command, `None` if it could not run or failed.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
