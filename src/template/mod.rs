// file: src/template/mod.rs
// version: 1.0.0
// guid: 62262771-a890-44e6-8f23-38903b0b53a4

//! Hybrid-boot template reconstruction
//!
//! This module handles:
//! - Parsing `--interval:` descriptors out of an El Torito boot report
//! - Resolving block units and extracting referenced byte ranges into partition images
//! - Normalizing boot-record flags
//! - Reassembling the report into a single-line xorriso argument template

pub mod assemble;
pub mod driver;
pub mod extract;
pub mod flags;
pub mod grammar;
pub mod spacing;
pub mod units;

pub use assemble::RewrittenTemplate;
pub use driver::{generate_template, TemplateGenerator, TemplatePlan};
pub use extract::{remove_partition_images, ExtractedPartitionImage, ExtractionJob};
pub use flags::{BootFlag, UnknownFlagWarning};
pub use grammar::{IntervalToken, ReportLine};
pub use spacing::Spacers;
pub use units::{BlockUnit, ParsedInterval};
