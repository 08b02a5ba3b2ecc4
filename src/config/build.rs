// file: src/config/build.rs
// version: 1.0.0
// guid: ce8925f3-0262-4ddb-a6b9-bf3ea2287e45

//! ISO rebuild configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default ISO9660 options passed to `xorriso -as mkisofs` ahead of the template
pub const DEFAULT_FILESYSTEM_OPTIONS: &[&str] = &["-r", "-J", "-joliet-long", "-l", "-iso-level", "3"];

/// Settings for rebuilding one customized ISO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Original installation medium
    pub source_iso: PathBuf,
    /// Modified filesystem tree written into the new image
    pub disk_tree: PathBuf,
    /// Output image path (defaults to `<work_dir>/<source stem>-custom.iso`)
    #[serde(default)]
    pub output_iso: Option<PathBuf>,
    /// Directory receiving extracted partition images
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default = "default_filesystem_options")]
    pub filesystem_options: Vec<String>,
    #[serde(default)]
    pub parallel_extraction: bool,
    #[serde(default)]
    pub keep_partition_images: bool,
    #[serde(default = "default_true")]
    pub write_checksum: bool,
}

fn default_work_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("ubuntu-iso-customizer")
        .join("work")
}

fn default_filesystem_options() -> Vec<String> {
    DEFAULT_FILESYSTEM_OPTIONS
        .iter()
        .map(|option| option.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl BuildConfig {
    /// Configuration with defaults for everything but the two required paths
    pub fn new(source_iso: impl Into<PathBuf>, disk_tree: impl Into<PathBuf>) -> Self {
        Self {
            source_iso: source_iso.into(),
            disk_tree: disk_tree.into(),
            output_iso: None,
            work_dir: default_work_dir(),
            filesystem_options: default_filesystem_options(),
            parallel_extraction: false,
            keep_partition_images: false,
            write_checksum: true,
        }
    }

    /// Output path, falling back to `<work_dir>/<source stem>-custom.iso`
    pub fn resolved_output(&self) -> PathBuf {
        if let Some(output) = &self.output_iso {
            return output.clone();
        }

        let stem = self
            .source_iso
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.work_dir.join(format!("{}-custom.iso", stem))
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if !self.source_iso.is_file() {
            return Err(crate::error::IsoError::validation(format!(
                "Source ISO not found: {}",
                self.source_iso.display()
            )));
        }

        if !self.disk_tree.is_dir() {
            return Err(crate::error::IsoError::validation(format!(
                "Disk tree is not a directory: {}",
                self.disk_tree.display()
            )));
        }

        if self.work_dir.as_os_str().is_empty() {
            return Err(crate::error::IsoError::validation(
                "Work directory must not be empty".to_string(),
            ));
        }

        if self.filesystem_options.iter().any(|option| option.trim().is_empty()) {
            return Err(crate::error::IsoError::validation(
                "Filesystem options must not contain empty entries".to_string(),
            ));
        }

        if same_path(&self.resolved_output(), &self.source_iso) {
            return Err(crate::error::IsoError::validation(format!(
                "Output ISO would overwrite the source ISO: {}",
                self.source_iso.display()
            )));
        }

        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, BuildConfig) {
        let dir = TempDir::new().unwrap();
        let iso = dir.path().join("ubuntu-24.04-live-server-amd64.iso");
        std::fs::write(&iso, b"iso").unwrap();
        let tree = dir.path().join("custom-disk");
        std::fs::create_dir(&tree).unwrap();

        let mut config = BuildConfig::new(iso, tree);
        config.work_dir = dir.path().join("work");
        (dir, config)
    }

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("/a.iso", "/tree");
        assert_eq!(
            config.filesystem_options,
            vec!["-r", "-J", "-joliet-long", "-l", "-iso-level", "3"]
        );
        assert!(!config.parallel_extraction);
        assert!(!config.keep_partition_images);
        assert!(config.write_checksum);
        assert!(config.work_dir.ends_with("ubuntu-iso-customizer/work"));
    }

    #[test]
    fn test_resolved_output_default_name() {
        let (dir, config) = fixture();
        assert_eq!(
            config.resolved_output(),
            dir.path()
                .join("work")
                .join("ubuntu-24.04-live-server-amd64-custom.iso")
        );
    }

    #[test]
    fn test_resolved_output_explicit() {
        let (_dir, mut config) = fixture();
        config.output_iso = Some(PathBuf::from("/out/custom.iso"));
        assert_eq!(config.resolved_output(), PathBuf::from("/out/custom.iso"));
    }

    #[test]
    fn test_validate_ok() {
        let (_dir, config) = fixture();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_source() {
        let (_dir, mut config) = fixture();
        config.source_iso = PathBuf::from("/definitely/missing.iso");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Source ISO not found"));
    }

    #[test]
    fn test_validate_missing_tree() {
        let (dir, mut config) = fixture();
        config.disk_tree = dir.path().join("nope");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_option() {
        let (_dir, mut config) = fixture();
        config.filesystem_options.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_output_overwrites_source() {
        let (_dir, mut config) = fixture();
        config.output_iso = Some(config.source_iso.clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overwrite the source"));
    }
}
