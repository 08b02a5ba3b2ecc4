// file: src/iso/checksum.rs
// version: 1.0.0
// guid: 0e3b9f41-5a7c-4c8e-b2d6-7f19a84c3e60

//! SHA256 checksums for built images

use crate::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Stream `path` through SHA256 and return the lower-case hex digest
pub async fn calculate_checksum(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).await?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Sidecar path for `iso`: the full file name with `.sha256` appended
pub fn checksum_path(iso: &Path) -> PathBuf {
    let mut name = iso.as_os_str().to_owned();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Write `<iso>.sha256` in `sha256sum` format and return the digest
pub async fn write_checksum_file(iso: &Path) -> Result<String> {
    let checksum = calculate_checksum(iso).await?;
    let file_name = iso
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sidecar = checksum_path(iso);
    fs::write(&sidecar, format!("{}  {}\n", checksum, file_name)).await?;

    info!("Image checksum (SHA256): {}", checksum);
    Ok(checksum)
}
