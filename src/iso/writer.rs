// file: src/iso/writer.rs
// version: 1.0.0
// guid: 24957505-c3c3-4a86-953d-8a69c7e7f0ec

//! ISO image writing with `xorriso -as mkisofs`

use crate::{config::DEFAULT_FILESYSTEM_OPTIONS, error::IsoError, Result};
use std::ffi::OsString;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

/// Split a flat template into arguments.
///
/// Whitespace separates arguments, single quotes group text and are removed, and quoted and
/// bare pieces that touch form one argument (`--interval:a:b:c:'/x y'` stays whole).
pub fn split_template(template: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut in_quote = false;

    for c in template.chars() {
        if in_quote {
            if c == '\'' {
                in_quote = false;
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            '\'' => {
                in_quote = true;
                in_arg = true;
            }
            c if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if in_quote {
        return Err(IsoError::format(1, template, "unterminated quote in template"));
    }
    if in_arg {
        args.push(current);
    }

    Ok(args)
}

/// Writes a new ISO from a disk tree and a boot template
pub struct IsoWriter {
    xorriso: String,
    filesystem_options: Vec<String>,
}

impl IsoWriter {
    pub fn new(filesystem_options: Vec<String>) -> Self {
        Self {
            xorriso: "xorriso".to_string(),
            filesystem_options,
        }
    }

    /// Use a specific xorriso binary
    pub fn with_binary(mut self, xorriso: impl Into<String>) -> Self {
        self.xorriso = xorriso.into();
        self
    }

    /// Full xorriso argument list for one build
    pub fn command_args(
        &self,
        template_args: &[String],
        output: &Path,
        disk_tree: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-as".into(), "mkisofs".into()];
        args.extend(self.filesystem_options.iter().map(OsString::from));
        args.extend(template_args.iter().map(OsString::from));
        args.push("-o".into());
        args.push(output.as_os_str().to_owned());
        args.push(disk_tree.as_os_str().to_owned());
        args
    }

    /// Write `output` from `disk_tree` using the boot `template`
    pub async fn write(&self, template: &str, output: &Path, disk_tree: &Path) -> Result<()> {
        let template_args = split_template(template)?;
        let args = self.command_args(&template_args, output, disk_tree);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        info!("Writing ISO image {}", output.display());
        debug!("{} {:?}", self.xorriso, args);

        let result = Command::new(&self.xorriso)
            .args(&args)
            .output()
            .await
            .map_err(|e| IsoError::Process {
                command: self.xorriso.clone(),
                exit_code: None,
                stderr: format!("failed to start: {}", e),
            })?;

        if !result.status.success() {
            return Err(IsoError::Process {
                command: format!("{} -as mkisofs", self.xorriso),
                exit_code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).to_string(),
            });
        }

        info!("ISO image written: {}", output.display());
        Ok(())
    }
}

impl Default for IsoWriter {
    fn default() -> Self {
        Self::new(
            DEFAULT_FILESYSTEM_OPTIONS
                .iter()
                .map(|option| option.to_string())
                .collect(),
        )
    }
}
