// file: src/template/flags.rs
// version: 1.0.0
// guid: 3544d53d-e48e-4e77-9fce-29ccee0f6da6

//! Boot-record flag normalization

use serde::Serialize;
use thiserror::Error;

const LOCAL_FS: &str = "local_fs";
const APPENDED_PARTITION: &str = "appended_partition";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("flag '{0}' has no partition index after appended_partition_")]
    MissingPartitionIndex(String),
}

/// Classified flags field of an interval descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootFlag {
    /// Range inside the source medium that must be extracted to a standalone image
    LocalFs,
    /// Appended partition, keeping only its index digits
    AppendedPartition { index: String },
    /// Anything else; the token is passed through untouched
    Unknown(String),
}

impl BootFlag {
    pub fn classify(flags: &str) -> Result<Self, FlagError> {
        if flags == LOCAL_FS {
            return Ok(BootFlag::LocalFs);
        }

        if let Some(rest) = flags.strip_prefix(APPENDED_PARTITION) {
            let index: String = rest
                .strip_prefix('_')
                .unwrap_or_default()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();

            if index.is_empty() {
                return Err(FlagError::MissingPartitionIndex(flags.to_string()));
            }
            return Ok(BootFlag::AppendedPartition { index });
        }

        Ok(BootFlag::Unknown(flags.to_string()))
    }

    /// Canonical text for the flags field
    pub fn canonical(&self) -> String {
        match self {
            BootFlag::LocalFs => LOCAL_FS.to_string(),
            BootFlag::AppendedPartition { index } => format!("{}_{}", APPENDED_PARTITION, index),
            BootFlag::Unknown(raw) => raw.clone(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, BootFlag::Unknown(_))
    }
}

/// Diagnostic for a flags value outside the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownFlagWarning {
    pub line_number: usize,
    pub flags: String,
}

impl std::fmt::Display for UnknownFlagWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: unknown interval flags '{}' passed through unchanged",
            self.line_number, self.flags
        )
    }
}
