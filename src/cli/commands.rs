// file: src/cli/commands.rs
// version: 2.0.0
// guid: g7h8i9j0-k1l2-3456-7890-123456ghijkl

//! Command implementations for the CLI

use crate::{
    config::{BuildConfig, ConfigLoader},
    error::IsoError,
    iso::{decode_template, encode_template, BootReporter, IsoBuilder},
    template::{RewrittenTemplate, TemplateGenerator},
    utils::system::SystemUtils,
    Result,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Options for the `template` command
pub struct TemplateOptions {
    pub report: Option<PathBuf>,
    pub iso: Option<PathBuf>,
    pub work_dir: PathBuf,
    pub source: Option<PathBuf>,
    pub parallel: bool,
    pub encode: bool,
    pub json: bool,
}

/// Generate a template from a saved or freshly captured boot report
pub async fn template_command(options: TemplateOptions) -> Result<()> {
    let report = match (&options.report, &options.iso) {
        (Some(path), _) => read_input(path)?,
        (None, Some(iso)) => BootReporter::new().capture(iso).await?,
        (None, None) => {
            return Err(IsoError::validation(
                "Either --report or --iso is required".to_string(),
            ))
        }
    };

    // A source medium is only needed once there is something to extract
    let source = options.source.clone().or_else(|| options.iso.clone());
    let generator = TemplateGenerator::new(options.work_dir, source.clone().unwrap_or_default());
    if source.is_none() && !generator.plan(&report)?.jobs.is_empty() {
        return Err(IsoError::validation(
            "--source is required when the report has local_fs intervals".to_string(),
        ));
    }

    let template = if options.parallel {
        generator.generate_parallel(&report).await?
    } else {
        generator.generate_blocking(report).await?
    };

    print_template(&template, options.encode, options.json)
}

fn print_template(template: &RewrittenTemplate, encode: bool, json: bool) -> Result<()> {
    for warning in &template.warnings {
        warn!("{}", warning);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(template)?);
    } else if encode {
        println!("{}", encode_template(&template.text)?);
    } else {
        println!("{}", template.text);
    }

    info!("Extracted {} partition images", template.images.len());
    Ok(())
}

/// Options for the `build` command
pub struct BuildOptions {
    pub config: Option<PathBuf>,
    pub iso: Option<PathBuf>,
    pub tree: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub parallel: bool,
    pub keep_images: bool,
    pub no_checksum: bool,
    pub json: bool,
}

/// Merge a config file with command line overrides
pub fn resolve_build_config(options: &BuildOptions) -> Result<BuildConfig> {
    let mut config = match (&options.config, &options.iso, &options.tree) {
        (Some(path), _, _) => ConfigLoader::new().parse_build_config(path)?,
        (None, Some(iso), Some(tree)) => BuildConfig::new(iso, tree),
        _ => {
            return Err(IsoError::validation(
                "Either --config or both --iso and --tree are required".to_string(),
            ))
        }
    };

    if options.config.is_some() {
        if let Some(iso) = &options.iso {
            config.source_iso = iso.clone();
        }
        if let Some(tree) = &options.tree {
            config.disk_tree = tree.clone();
        }
    }
    if let Some(output) = &options.output {
        config.output_iso = Some(output.clone());
    }
    if let Some(work_dir) = &options.work_dir {
        config.work_dir = work_dir.clone();
    }
    config.parallel_extraction |= options.parallel;
    config.keep_partition_images |= options.keep_images;
    if options.no_checksum {
        config.write_checksum = false;
    }

    config.validate()?;
    Ok(config)
}

/// Rebuild an ISO
pub async fn build_command(options: BuildOptions) -> Result<()> {
    let config = resolve_build_config(&options)?;
    let outcome = IsoBuilder::new(config).build().await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", outcome.output_iso.display());
    if let Some(checksum) = &outcome.checksum {
        info!("SHA256: {}", checksum);
    }
    Ok(())
}

/// Print the boot report of an ISO
pub async fn report_command(iso: &Path) -> Result<()> {
    let report = BootReporter::new().capture(iso).await?;
    print!("{}", report);
    if !report.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Encode a template for storage
pub fn encode_command(input: &str) -> Result<()> {
    let text = read_text_arg(input)?;
    println!("{}", encode_template(text.trim_end_matches(['\r', '\n']))?);
    Ok(())
}

/// Decode a stored template
pub fn decode_command(input: &str) -> Result<()> {
    let text = read_text_arg(input)?;
    println!("{}", decode_template(&text)?);
    Ok(())
}

/// Check system prerequisites
pub async fn check_prerequisites_command() -> Result<()> {
    info!("Checking system prerequisites for ISO rebuilding");

    let missing = SystemUtils::check_prerequisites();

    if missing.is_empty() {
        info!("✓ All required system commands are available");
        if let Some(version) = SystemUtils::tool_version("xorriso").await {
            info!("✓ {}", version);
        }
        info!("System is ready for ISO rebuilding");
        Ok(())
    } else {
        error!("✗ Missing required commands: {}", missing.join(", "));
        info!("Install missing packages:");
        for cmd in &missing {
            if cmd == "xorriso" {
                info!("  sudo apt install xorriso");
            }
        }
        Err(IsoError::validation(format!(
            "Missing required commands: {}",
            missing.join(", ")
        )))
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        read_stdin()
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn read_text_arg(input: &str) -> Result<String> {
    if input == "-" {
        read_stdin()
    } else {
        Ok(input.to_string())
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_options() -> BuildOptions {
        BuildOptions {
            config: None,
            iso: None,
            tree: None,
            output: None,
            work_dir: None,
            parallel: false,
            keep_images: false,
            no_checksum: false,
            json: false,
        }
    }

    #[test]
    fn test_resolve_build_config_from_flags() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let iso = dir.path().join("src.iso");
        std::fs::write(&iso, b"iso").unwrap();
        let mut options = build_options();
        options.iso = Some(iso.clone());
        options.tree = Some(dir.path().to_path_buf());
        options.work_dir = Some(dir.path().join("work"));
        options.no_checksum = true;
        options.parallel = true;

        // Act
        let config = resolve_build_config(&options).unwrap();

        // Assert
        assert_eq!(config.source_iso, iso);
        assert!(!config.write_checksum);
        assert!(config.parallel_extraction);
        assert_eq!(config.resolved_output(), dir.path().join("work").join("src-custom.iso"));
    }

    #[test]
    fn test_resolve_build_config_overrides_file() {
        let dir = TempDir::new().unwrap();
        let iso = dir.path().join("src.iso");
        std::fs::write(&iso, b"iso").unwrap();
        let config_path = dir.path().join("build.yaml");
        std::fs::write(
            &config_path,
            format!(
                "source_iso: {}\ndisk_tree: {}\nwork_dir: {}\n",
                iso.display(),
                dir.path().display(),
                dir.path().join("work").display()
            ),
        )
        .unwrap();

        let mut options = build_options();
        options.config = Some(config_path);
        options.output = Some(dir.path().join("out.iso"));
        options.keep_images = true;

        let config = resolve_build_config(&options).unwrap();

        assert_eq!(config.resolved_output(), dir.path().join("out.iso"));
        assert!(config.keep_partition_images);
    }

    #[test]
    fn test_resolve_build_config_requires_inputs() {
        let mut options = build_options();
        options.iso = Some(PathBuf::from("/a.iso"));
        assert!(matches!(
            resolve_build_config(&options),
            Err(IsoError::Validation(_))
        ));
    }

    fn template_options(dir: &TempDir, report: &str) -> TemplateOptions {
        let report_path = dir.path().join("report.txt");
        std::fs::write(&report_path, report).unwrap();
        TemplateOptions {
            report: Some(report_path),
            iso: None,
            work_dir: dir.path().join("work"),
            source: None,
            parallel: false,
            encode: false,
            json: false,
        }
    }

    #[tokio::test]
    async fn test_template_command_requires_source_for_local_fs() {
        let dir = TempDir::new().unwrap();
        let options = template_options(&dir, "-V 'x'\n-isohybrid-mbr --interval:local_fs:0s-15s:z:'/s.iso'\n");

        let result = template_command(options).await;

        match result {
            Err(IsoError::Validation(msg)) => assert!(msg.contains("--source")),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert!(!dir.path().join("work").exists());
    }

    #[tokio::test]
    async fn test_template_command_without_source_when_nothing_to_extract() {
        let dir = TempDir::new().unwrap();
        let options = template_options(
            &dir,
            "-V 'x'\n-append_partition 2 0xef --interval:appended_partition_2_start_1s_size_1d:all::'/s.iso'\n",
        );

        let result = template_command(options).await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_read_text_arg_literal() {
        assert_eq!(read_text_arg("ABCD").unwrap(), "ABCD");
    }
}
