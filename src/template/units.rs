// file: src/template/units.rs
// version: 1.0.0
// guid: ab40c792-3096-4457-9707-46e5cf7b2ae3

//! Block-unit resolution for interval descriptors
//!
//! xorriso addresses byte ranges as `<start><unit>-<stop><unit>`, both bounds inclusive.
//! The unit suffix selects the block size: `k`, `m`, `g`, `t` are binary multiples,
//! `s` is a 2048-byte CD sector, `d` a 512-byte disk sector, anything else is one byte.

use serde::Serialize;
use thiserror::Error;

/// Resolution failures, split by whether the descriptor is malformed or its numbers are
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("interval '{0}' is not of the form <start><unit>-<stop><unit>")]
    Malformed(String),

    #[error("interval bounds use different units ('{start}' vs '{stop}')")]
    MismatchedUnits { start: String, stop: String },

    #[error("block number '{0}' is not a valid unsigned integer")]
    InvalidBlockNumber(String),

    #[error("stop block {stop} precedes start block {start}")]
    Reversed { start: u64, stop: u64 },

    #[error("byte range of {0} overflows a 64-bit offset")]
    Overflow(String),
}

impl UnitError {
    /// Whether the error describes report structure rather than block arithmetic
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::MismatchedUnits { .. })
    }
}

/// Block unit named by an interval suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockUnit {
    Byte,
    Kibibyte,
    Mebibyte,
    Gibibyte,
    Tebibyte,
    CdSector,
    DiskSector,
}

impl BlockUnit {
    /// Look up the unit for a suffix. Absent or unknown suffixes count single bytes.
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "k" => BlockUnit::Kibibyte,
            "m" => BlockUnit::Mebibyte,
            "g" => BlockUnit::Gibibyte,
            "t" => BlockUnit::Tebibyte,
            "s" => BlockUnit::CdSector,
            "d" => BlockUnit::DiskSector,
            _ => BlockUnit::Byte,
        }
    }

    /// Block size in bytes
    pub fn block_size(&self) -> u64 {
        match self {
            BlockUnit::Byte => 1,
            BlockUnit::Kibibyte => 1 << 10,
            BlockUnit::Mebibyte => 1 << 20,
            BlockUnit::Gibibyte => 1 << 30,
            BlockUnit::Tebibyte => 1 << 40,
            BlockUnit::CdSector => 2048,
            BlockUnit::DiskSector => 512,
        }
    }
}

/// A resolved interval descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInterval {
    pub start_block: u64,
    pub stop_block: u64,
    /// Suffix text exactly as it appeared, reused when the interval is rebuilt
    pub unit_suffix: String,
    pub unit: BlockUnit,
    pub block_size_bytes: u64,
    pub block_count: u64,
}

impl ParsedInterval {
    /// Resolve a descriptor such as `16s-31s`
    pub fn parse(descriptor: &str) -> Result<Self, UnitError> {
        let (start, stop) = descriptor
            .split_once('-')
            .ok_or_else(|| UnitError::Malformed(descriptor.to_string()))?;

        let (start_block, start_suffix) = split_bound(start, descriptor)?;
        let (stop_block, stop_suffix) = split_bound(stop, descriptor)?;

        if start_suffix != stop_suffix {
            return Err(UnitError::MismatchedUnits {
                start: start_suffix.to_string(),
                stop: stop_suffix.to_string(),
            });
        }

        if stop_block < start_block {
            return Err(UnitError::Reversed {
                start: start_block,
                stop: stop_block,
            });
        }

        let block_count = (stop_block - start_block)
            .checked_add(1)
            .ok_or_else(|| UnitError::Overflow(descriptor.to_string()))?;

        let unit = BlockUnit::from_suffix(start_suffix);
        let parsed = Self {
            start_block,
            stop_block,
            unit_suffix: start_suffix.to_string(),
            unit,
            block_size_bytes: unit.block_size(),
            block_count,
        };

        // Reject ranges that cannot be addressed before anything touches the disk
        parsed.byte_offset()?;
        parsed.byte_len()?;

        Ok(parsed)
    }

    /// Offset of the first byte in the source medium
    pub fn byte_offset(&self) -> Result<u64, UnitError> {
        self.start_block
            .checked_mul(self.block_size_bytes)
            .ok_or_else(|| UnitError::Overflow(self.to_string()))
    }

    /// Number of bytes covered by the interval
    pub fn byte_len(&self) -> Result<u64, UnitError> {
        let len = self
            .block_count
            .checked_mul(self.block_size_bytes)
            .ok_or_else(|| UnitError::Overflow(self.to_string()))?;
        self.byte_offset()?
            .checked_add(len)
            .ok_or_else(|| UnitError::Overflow(self.to_string()))?;
        Ok(len)
    }

    /// The same length re-based to start at block zero, keeping the original suffix
    pub fn rebased(&self) -> String {
        format!(
            "0{unit}-{stop}{unit}",
            unit = self.unit_suffix,
            stop = self.block_count - 1
        )
    }
}

impl std::fmt::Display for ParsedInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}-{}{}",
            self.start_block, self.unit_suffix, self.stop_block, self.unit_suffix
        )
    }
}

/// Split `<digits><suffix>` into the block number and its suffix
fn split_bound<'a>(bound: &'a str, descriptor: &str) -> Result<(u64, &'a str), UnitError> {
    let digits_end = bound
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(bound.len());
    let (digits, suffix) = bound.split_at(digits_end);

    if digits.is_empty() {
        return Err(UnitError::InvalidBlockNumber(bound.to_string()));
    }
    if !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(UnitError::Malformed(descriptor.to_string()));
    }

    let block = digits
        .parse::<u64>()
        .map_err(|_| UnitError::InvalidBlockNumber(digits.to_string()))?;

    Ok((block, suffix))
}
