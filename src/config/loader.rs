// file: src/config/loader.rs
// version: 2.0.0
// guid: d4e5f6g7-h8i9-0123-4567-890123defghi

//! Configuration file loading and environment variable substitution

use super::BuildConfig;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load a build configuration from a YAML file and validate it
    pub fn load_build_config<P: AsRef<Path>>(&self, path: P) -> Result<BuildConfig> {
        let config = self.parse_build_config(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a build configuration without checking that the referenced paths exist
    pub fn parse_build_config<P: AsRef<Path>>(&self, path: P) -> Result<BuildConfig> {
        let content = fs::read_to_string(&path).map_err(|e| {
            crate::error::IsoError::config(format!(
                "Failed to read build config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let expanded = self.expand_env_vars(&content)?;
        let config: BuildConfig = serde_yaml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand `${VAR}` references in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            crate::error::IsoError::config(format!("Invalid regex pattern: {}", e))
        })?;

        let mut missing_vars = Vec::new();
        let expanded = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match self.env_vars.get(var_name) {
                Some(value) => value.clone(),
                None => {
                    if !missing_vars.iter().any(|v: &String| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });

        if !missing_vars.is_empty() {
            return Err(crate::error::IsoError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(expanded.into_owned())
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_env_var_expansion() {
        let mut loader = ConfigLoader::new();
        loader.set_env_var("TEST_ISO_DIR".to_string(), "/srv/isos".to_string());

        let content = "source_iso: ${TEST_ISO_DIR}/ubuntu.iso";
        let result = loader.expand_env_vars(content).unwrap();
        assert_eq!(result, "source_iso: /srv/isos/ubuntu.iso");
    }

    #[test]
    fn test_missing_env_vars_are_all_listed() {
        let loader = ConfigLoader::new();
        let content = "a: ${ISO_CUSTOMIZER_MISSING_A}\nb: ${ISO_CUSTOMIZER_MISSING_B}\nc: ${ISO_CUSTOMIZER_MISSING_A}";

        let err = loader.expand_env_vars(content).unwrap_err().to_string();

        assert!(err.contains("Missing environment variables"));
        assert!(err.contains("ISO_CUSTOMIZER_MISSING_A, ISO_CUSTOMIZER_MISSING_B"));
    }

    #[test]
    fn test_parse_build_config_applies_defaults() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
source_iso: /isos/ubuntu-20.04.1-live-server-amd64.iso
disk_tree: /project/custom-disk
parallel_extraction: true
"#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let config = loader.parse_build_config(file.path())?;

        assert_eq!(
            config.source_iso,
            std::path::PathBuf::from("/isos/ubuntu-20.04.1-live-server-amd64.iso")
        );
        assert!(config.parallel_extraction);
        assert!(config.write_checksum);
        assert_eq!(config.filesystem_options.len(), 6);
        assert!(config.output_iso.is_none());

        Ok(())
    }

    #[test]
    fn test_load_build_config_validates() -> Result<()> {
        // Arrange
        let dir = TempDir::new().unwrap();
        let iso = dir.path().join("source.iso");
        std::fs::write(&iso, b"iso")?;
        let tree = dir.path().join("tree");
        std::fs::create_dir(&tree)?;
        let config_path = dir.path().join("build.yaml");
        std::fs::write(
            &config_path,
            format!(
                "source_iso: {}\ndisk_tree: {}\nwork_dir: {}\n",
                iso.display(),
                tree.display(),
                dir.path().join("work").display()
            ),
        )?;

        // Act
        let loader = ConfigLoader::new();
        let config = loader.load_build_config(&config_path)?;

        // Assert
        assert_eq!(config.disk_tree, tree);
        Ok(())
    }

    #[test]
    fn test_load_build_config_missing_file() {
        let loader = ConfigLoader::new();
        let err = loader.load_build_config("/no/such/build.yaml").unwrap_err();
        assert!(matches!(err, crate::error::IsoError::Config(_)));
    }
}
