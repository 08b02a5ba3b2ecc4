// file: src/iso/builder.rs
// version: 1.0.0
// guid: 9a41c6d8-2f0e-4b77-a3c5-58e2d90b1f17

//! End-to-end rebuild of a customized hybrid-boot ISO

use super::{checksum::write_checksum_file, report::BootReporter, writer::IsoWriter};
use crate::{
    config::BuildConfig,
    template::{remove_partition_images, RewrittenTemplate, TemplateGenerator},
    Result,
};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// Result of one successful rebuild
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub output_iso: PathBuf,
    pub checksum: Option<String>,
    pub template: RewrittenTemplate,
}

/// Rebuilds an ISO with the boot structure of its source medium
pub struct IsoBuilder {
    config: BuildConfig,
    reporter: BootReporter,
    writer: IsoWriter,
}

impl IsoBuilder {
    pub fn new(config: BuildConfig) -> Self {
        let writer = IsoWriter::new(config.filesystem_options.clone());
        Self {
            config,
            reporter: BootReporter::new(),
            writer,
        }
    }

    /// Use a specific xorriso binary for both report capture and writing
    pub fn with_xorriso(mut self, xorriso: &str) -> Self {
        self.reporter = BootReporter::with_binary(xorriso);
        self.writer = self.writer.with_binary(xorriso);
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Capture the report, build the template, write the ISO and its checksum
    pub async fn build(&self) -> Result<BuildOutcome> {
        self.config.validate()?;
        let output = self.config.resolved_output();
        info!(
            "Rebuilding {} from {}",
            output.display(),
            self.config.disk_tree.display()
        );

        self.setup_work_dir().await?;

        let report = self.reporter.capture(&self.config.source_iso).await?;
        let template = self.generate(report).await?;
        debug!("Template: {}", template.text);

        let written = self
            .writer
            .write(&template.text, &output, &self.config.disk_tree)
            .await;
        self.cleanup_images(&template);
        written?;

        let checksum = if self.config.write_checksum {
            Some(write_checksum_file(&output).await?)
        } else {
            None
        };

        info!("ISO rebuild completed: {}", output.display());
        Ok(BuildOutcome {
            output_iso: output,
            checksum,
            template,
        })
    }

    async fn generate(&self, report: String) -> Result<RewrittenTemplate> {
        let generator =
            TemplateGenerator::new(self.config.work_dir.clone(), self.config.source_iso.clone());

        if self.config.parallel_extraction {
            return generator.generate_parallel(&report).await;
        }

        generator.generate_blocking(report).await
    }

    async fn setup_work_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.config.work_dir).await?;
        debug!("Work directory: {}", self.config.work_dir.display());
        Ok(())
    }

    fn cleanup_images(&self, template: &RewrittenTemplate) {
        if self.config.keep_partition_images {
            debug!("Keeping {} partition images", template.images.len());
            return;
        }

        if let Err(e) = remove_partition_images(&template.image_paths()) {
            warn!("Failed to remove partition images: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsoError;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> BuildConfig {
        let iso = dir.path().join("source.iso");
        std::fs::write(&iso, vec![0u8; 4096]).unwrap();
        let tree = dir.path().join("tree");
        std::fs::create_dir(&tree).unwrap();

        let mut config = BuildConfig::new(iso, tree);
        config.work_dir = dir.path().join("work");
        config
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.source_iso = dir.path().join("missing.iso");

        let result = IsoBuilder::new(config).build().await;

        assert!(matches!(result, Err(IsoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_build_without_xorriso_fails_at_report() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let builder = IsoBuilder::new(config(&dir)).with_xorriso("/nonexistent/xorriso-binary");

        // Act
        let result = builder.build().await;

        // Assert
        assert!(matches!(result, Err(IsoError::Process { .. })));
        assert!(dir.path().join("work").is_dir());
        assert!(!dir.path().join("work").join("source-custom.iso").exists());
    }

    #[test]
    fn test_writer_uses_configured_options() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.filesystem_options = vec!["-r".to_string()];

        let builder = IsoBuilder::new(config);
        let args = builder.writer.command_args(
            &[],
            &PathBuf::from("/out.iso"),
            &PathBuf::from("/tree"),
        );

        assert_eq!(args.len(), 6);
        assert_eq!(args[2], "-r");
    }
}
