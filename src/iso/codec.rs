// file: src/iso/codec.rs
// version: 1.0.0
// guid: 6f0c7d2e-91a4-4b3b-8e55-0d7c1a2f9b34

//! Compact transport encoding for templates (zlib, then upper-case hex)

use crate::{error::IsoError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compress `template` and render it as upper-case hex
pub fn encode_template(template: &str) -> Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(template.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(hex::encode_upper(compressed))
}

/// Reverse of [`encode_template`]; surrounding whitespace is ignored
pub fn decode_template(encoded: &str) -> Result<String> {
    let compressed = hex::decode(encoded.trim())
        .map_err(|e| IsoError::codec(format!("invalid hex: {}", e)))?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| IsoError::codec(format!("invalid zlib stream: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| IsoError::codec(format!("template is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "-V 'Ubuntu 20.04.1 LTS amd64' -J -joliet-long -isohybrid-mbr --interval:local_fs:0s-15s:zero_mbrpt,zero_gpt:'/work/partition-1.img'";

    #[test]
    fn test_encode_is_upper_hex() {
        let encoded = encode_template(TEMPLATE).unwrap();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert_eq!(decode_template(&encoded).unwrap(), TEMPLATE);
    }

    #[test]
    fn test_decode_accepts_lowercase_and_trailing_newline() {
        let encoded = encode_template(TEMPLATE).unwrap().to_lowercase();
        let decoded = decode_template(&format!("{}\n", encoded)).unwrap();
        assert_eq!(decoded, TEMPLATE);
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        let err = decode_template("XYZ").unwrap_err();
        assert!(matches!(err, IsoError::Codec(_)));
    }

    #[test]
    fn test_decode_rejects_non_zlib_payload() {
        // Valid hex, but not a zlib stream
        let err = decode_template("DEADBEEF").unwrap_err();
        assert!(err.to_string().contains("zlib"));
    }
}
