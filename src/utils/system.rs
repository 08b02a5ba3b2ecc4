// file: src/utils/system.rs
// version: 2.0.0
// guid: w3x4y5z6-a7b8-9012-3456-789012wxyzab

//! System utility functions

use crate::Result;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// External tools a rebuild needs on PATH
pub const REQUIRED_COMMANDS: &[&str] = &["xorriso"];

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        which::which(command).is_ok()
    }

    /// Resolve a command to its full path
    pub fn locate(command: &str) -> Result<PathBuf> {
        which::which(command).map_err(|e| {
            crate::error::IsoError::validation(format!("Command '{}' not found: {}", command, e))
        })
    }

    /// First line of `<command> --version`, if the command runs
    pub async fn tool_version(command: &str) -> Option<String> {
        let output = Command::new(command).arg("--version").output().await.ok()?;
        if !output.status.success() {
            debug!("{} --version exited with {:?}", command, output.status.code());
            return None;
        }

        // xorriso prints its version banner on stdout, some builds use stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        stdout
            .lines()
            .chain(stderr.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    /// Names of required commands missing from PATH
    pub fn check_prerequisites() -> Vec<String> {
        REQUIRED_COMMANDS
            .iter()
            .filter(|command| !Self::command_exists(command))
            .map(|command| command.to_string())
            .collect()
    }
}
