// file: src/iso/report.rs
// version: 1.0.0
// guid: b0ba5e48-99f5-45b8-8494-627f6a1cc623

//! Boot report capture via `xorriso -report_el_torito as_mkisofs`

use crate::Result;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Option that opens every as_mkisofs report (the volume id)
const REPORT_START: &str = "-V";

/// Cut xorriso's result output down to the report itself, starting at the `-V` line
pub fn trim_report(raw: &str) -> Option<&str> {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let opens_report = trimmed.trim_end() == REPORT_START
            || trimmed.starts_with("-V ")
            || trimmed.starts_with("-V\t");
        if opens_report {
            let indent = line.len() - trimmed.len();
            return Some(&raw[offset + indent..]);
        }
        offset += line.len();
    }
    None
}

/// Runs xorriso against a source medium to describe its boot structure
pub struct BootReporter {
    xorriso: String,
}

impl BootReporter {
    pub fn new() -> Self {
        Self {
            xorriso: "xorriso".to_string(),
        }
    }

    /// Use a specific xorriso binary
    pub fn with_binary(xorriso: impl Into<String>) -> Self {
        Self {
            xorriso: xorriso.into(),
        }
    }

    /// Arguments passed to xorriso for `iso`
    pub fn command_args(iso: &Path) -> Vec<std::ffi::OsString> {
        vec![
            "-indev".into(),
            iso.as_os_str().to_owned(),
            "-report_el_torito".into(),
            "as_mkisofs".into(),
        ]
    }

    /// Capture the boot report for `iso`
    pub async fn capture(&self, iso: &Path) -> Result<String> {
        info!("Reading boot report for {}", iso.display());

        let output = Command::new(&self.xorriso)
            .args(Self::command_args(iso))
            .output()
            .await
            .map_err(|e| crate::error::IsoError::Process {
                command: self.xorriso.clone(),
                exit_code: None,
                stderr: format!("failed to start: {}", e),
            })?;

        if !output.status.success() {
            return Err(crate::error::IsoError::Process {
                command: format!(
                    "{} -indev {} -report_el_torito as_mkisofs",
                    self.xorriso,
                    iso.display()
                ),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        // Results go to stdout; xorriso's banner and progress go to stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let report = trim_report(&stdout).ok_or_else(|| {
            crate::error::IsoError::validation(format!(
                "No El Torito boot report found for {}",
                iso.display()
            ))
        })?;

        debug!("Boot report:\n{}", report);
        Ok(report.to_string())
    }
}

impl Default for BootReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_trim_report_skips_preamble() {
        // Arrange
        let raw = "xorriso 1.5.4 : RockRidge filesystem manipulator\nDrive current: -indev 'ubuntu.iso'\n-V 'Ubuntu 20.04.1 LTS amd64'\n--modification-date='2020073116511200'\n-J\n";

        // Act
        let report = trim_report(raw).unwrap();

        // Assert
        assert_eq!(
            report,
            "-V 'Ubuntu 20.04.1 LTS amd64'\n--modification-date='2020073116511200'\n-J\n"
        );
    }

    #[test]
    fn test_trim_report_ignores_options_merely_starting_with_v() {
        let raw = "-Volume stuff\n-V 'x'\n";
        assert_eq!(trim_report(raw), Some("-V 'x'\n"));
    }

    #[test]
    fn test_trim_report_without_volume_id() {
        assert_eq!(trim_report("no report here\n"), None);
        assert_eq!(trim_report(""), None);
    }

    #[test]
    fn test_command_args() {
        let args = BootReporter::command_args(&PathBuf::from("/isos/ubuntu.iso"));
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["-indev", "/isos/ubuntu.iso", "-report_el_torito", "as_mkisofs"]
        );
    }

    #[tokio::test]
    async fn test_capture_with_missing_binary() {
        let reporter = BootReporter::with_binary("/nonexistent/xorriso-binary");
        let result = reporter.capture(&PathBuf::from("/tmp/none.iso")).await;
        assert!(matches!(
            result,
            Err(crate::error::IsoError::Process { exit_code: None, .. })
        ));
    }
}
