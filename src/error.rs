// file: src/error.rs
// version: 3.0.0
// guid: 57b83a63-07b6-4534-aa6c-51e8797254e0

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, IsoError>;

/// Error types for ISO template reconstruction and rebuilding
#[derive(Error, Debug)]
pub enum IsoError {
    #[error("Format error at report line {line_number}: {reason} (line: {line})")]
    Format {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Extraction error for {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Command '{command}' failed with exit code {exit_code:?}: {stderr}")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Template codec error: {0}")]
    Codec(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl IsoError {
    /// Create a new format error for a report line
    pub fn format(line_number: usize, line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            line_number,
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create a new arithmetic error
    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    /// Create a new extraction error
    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new codec error
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_reports_line_number_and_content() {
        // Arrange
        let err = IsoError::format(7, "-c boot.cat --interval:local_fs", "missing interval field");

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("line 7"));
        assert!(msg.contains("missing interval field"));
        assert!(msg.contains("-c boot.cat --interval:local_fs"));
    }

    #[test]
    fn test_extraction_error_names_destination() {
        let err = IsoError::extraction("/work/partition-2.img", "source too short");
        let msg = err.to_string();
        assert!(msg.contains("/work/partition-2.img"));
        assert!(msg.contains("source too short"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: IsoError = io.into();
        assert!(matches!(err, IsoError::Io(_)));
    }
}
