//! Shell Integration
//!
//! Opens web console links with the platform's URL handler.

use std::process::{Command, Stdio};

/// Result of a shell operation
#[derive(Debug, PartialEq, Eq)]
pub enum ShellResult {
    /// Command completed successfully
    Success,
    /// Command failed with exit code
    Failed(i32),
    /// Error launching command
    Error(String),
}

/// Platform command opening `url` in the default browser
fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), url.to_string()],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

/// Open URL in browser (for console links)
pub fn open_browser(url: &str) -> ShellResult {
    let (cmd, args) = browser_command(url);
    tracing::info!("Opening {} with {}", url, cmd);
    execute_command(cmd, &args)
}

/// Execute a command without touching the terminal
fn execute_command(cmd: &str, args: &[String]) -> ShellResult {
    match Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => ShellResult::Success,
        Ok(status) => ShellResult::Failed(status.code().unwrap_or(-1)),
        Err(e) => ShellResult::Error(format!("Failed to execute {}: {}", cmd, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_command_passes_url_last() {
        let url = "https://console.scaleway.com/rdb/instances/fr-par/x/overview";
        let (_, args) = browser_command(url);
        assert_eq!(args.last().map(String::as_str), Some(url));
    }

    #[test]
    fn test_missing_command_is_an_error() {
        let result = execute_command("tscw-no-such-command", &[]);
        assert!(matches!(result, ShellResult::Error(_)));
    }
}
