// file: src/iso/mod.rs
// version: 1.0.0
// guid: 3c5e8a10-7b2d-4f69-9e04-b1a6d7c2e8f5

//! ISO collaborators around the template engine
//!
//! Report capture, image writing, checksums, template transport encoding
//! and the build pipeline that ties them together.

pub mod builder;
pub mod checksum;
pub mod codec;
pub mod report;
pub mod writer;

pub use builder::{BuildOutcome, IsoBuilder};
pub use checksum::{calculate_checksum, write_checksum_file};
pub use codec::{decode_template, encode_template};
pub use report::{trim_report, BootReporter};
pub use writer::{split_template, IsoWriter};
