use anyhow::{bail, Context, Result};
use tokio::process::Command;

/// Run `program` with `args` and return its stdout, trimmed.
pub async fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .with_context(|| format!("Failed to run {}", program))?;

    if !output.status.success() {
        bail!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a shell command line through `sh -c`.
pub async fn run_shell(command: &str) -> Result<String> {
    run_command("sh", &["-c", command]).await
}
