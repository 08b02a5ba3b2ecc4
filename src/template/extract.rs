// file: src/template/extract.rs
// version: 1.0.0
// guid: 8de9b1f4-ee5b-4e29-9303-386ad1e0c831

//! Block-addressed extraction of byte ranges from the source medium

use crate::{error::IsoError, Result};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Upper bound on the copy buffer; smaller blocks are batched up to this size
const MAX_COPY_BUFFER: u64 = 1024 * 1024;

/// File name of the `index`-th extracted partition image
pub fn partition_image_name(index: usize) -> String {
    format!("partition-{}.img", index)
}

/// One byte range to copy out of the source medium
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    /// 1-based image number, assigned in report order
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub block_size: u64,
    pub start_block: u64,
    pub block_count: u64,
}

/// A partition image written by an [`ExtractionJob`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedPartitionImage {
    pub index: usize,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ExtractionJob {
    /// Copy the range, removing any partial destination on failure
    pub fn run(&self) -> Result<ExtractedPartitionImage> {
        info!(
            "Extracting partition image {} ({} x {} bytes from block {}) to {}",
            self.index,
            self.block_count,
            self.block_size,
            self.start_block,
            self.destination.display()
        );

        match self.copy_blocks() {
            Ok(size_bytes) => Ok(ExtractedPartitionImage {
                index: self.index,
                path: self.destination.clone(),
                size_bytes,
            }),
            Err(reason) => {
                if self.destination.exists() {
                    if let Err(e) = fs::remove_file(&self.destination) {
                        warn!(
                            "Failed to remove partial image {}: {}",
                            self.destination.display(),
                            e
                        );
                    }
                }
                Err(IsoError::extraction(&self.destination, reason))
            }
        }
    }

    fn copy_blocks(&self) -> std::result::Result<u64, String> {
        let total = self
            .block_count
            .checked_mul(self.block_size)
            .ok_or("byte length overflows u64")?;
        let offset = self
            .start_block
            .checked_mul(self.block_size)
            .ok_or("byte offset overflows u64")?;

        let mut source = File::open(&self.source)
            .map_err(|e| format!("cannot open source {}: {}", self.source.display(), e))?;
        let metadata = source
            .metadata()
            .map_err(|e| format!("cannot stat source {}: {}", self.source.display(), e))?;

        // Device nodes report a length of 0; their end is only found by reading
        let end = offset.checked_add(total).ok_or("byte range overflows u64")?;
        if metadata.is_file() && end > metadata.len() {
            return Err(format!(
                "source too short: range ends at byte {} but {} is {} bytes",
                end,
                self.source.display(),
                metadata.len()
            ));
        }

        source
            .seek(SeekFrom::Start(offset))
            .map_err(|e| format!("cannot seek to byte {}: {}", offset, e))?;

        let mut destination = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.destination)
            .map_err(|e| format!("cannot create destination: {}", e))?;

        let buffer_len = copy_buffer_len(self.block_size);
        let mut buffer = vec![0u8; buffer_len as usize];
        let mut remaining = total;

        while remaining > 0 {
            let chunk = remaining.min(buffer_len) as usize;
            source
                .read_exact(&mut buffer[..chunk])
                .map_err(|e| {
                    let copied = total - remaining;
                    if e.kind() == std::io::ErrorKind::UnexpectedEof {
                        format!(
                            "source too short: {} ended before byte {}",
                            self.source.display(),
                            offset + copied + chunk as u64
                        )
                    } else {
                        format!("read failed after {} bytes: {}", copied, e)
                    }
                })?;
            destination
                .write_all(&buffer[..chunk])
                .map_err(|e| format!("write failed after {} bytes: {}", total - remaining, e))?;
            remaining -= chunk as u64;
        }

        destination
            .sync_all()
            .map_err(|e| format!("cannot flush destination: {}", e))?;

        debug!("Copied {} bytes from offset {}", total, offset);
        Ok(total)
    }
}

/// Whole blocks per read, capped at [`MAX_COPY_BUFFER`]
fn copy_buffer_len(block_size: u64) -> u64 {
    if block_size == 0 || block_size >= MAX_COPY_BUFFER {
        return MAX_COPY_BUFFER;
    }
    (MAX_COPY_BUFFER / block_size) * block_size
}

/// Remove extracted partition images once the ISO writer no longer needs them
pub fn remove_partition_images<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(IsoError::Io(e)),
        }
    }
    Ok(())
}
