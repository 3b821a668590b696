//! Benchmark process invocation.

use std::process::Command;

use anyhow::{bail, Context};
use tracing::info;

/// Run `command` to completion and return its captured stdout.
///
/// On a non-zero exit the captured stdout and stderr are echoed to stderr
/// before failing, so the cause stays visible.
pub fn run_benchmark(command: &[String]) -> anyhow::Result<String> {
    let (program, args) = command
        .split_first()
        .context("Benchmark command is empty")?;

    info!(command = %command.join(" "), "Running benchmark command");
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to spawn `{}`", program))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        eprintln!("{}", stdout);
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        bail!("Benchmark command `{}` failed: {}", command.join(" "), output.status);
    }

    Ok(stdout)
}
