// file: src/lib.rs
// version: 3.0.0
// guid: d82472d1-7f0f-4eb4-b0a3-6e1547103eb4

//! # Ubuntu ISO Customizer
//!
//! Rebuilds customized hybrid-boot installation images. The boot structure of the
//! original medium is read from xorriso's `-report_el_torito as_mkisofs` report,
//! the regions it references are extracted into standalone partition images, and
//! the report is rewritten into a single-line template that `xorriso -as mkisofs`
//! can replay against a modified filesystem tree.

pub mod cli;
pub mod config;
pub mod error;
pub mod iso;
pub mod logging;
pub mod template;
pub mod utils;

pub use error::{IsoError, Result};
pub use template::{generate_template, RewrittenTemplate, TemplateGenerator};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
