// file: src/cli/args.rs
// version: 2.0.0
// guid: f6g7h8i9-j0k1-2345-6789-012345fghijk

//! Command line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ubuntu-iso-customizer")]
#[command(about = "Rebuild customized hybrid-boot Ubuntu ISOs with the original boot structure")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an xorriso boot template from a boot report
    Template {
        #[arg(
            short,
            long,
            conflicts_with = "iso",
            required_unless_present = "iso",
            help = "Saved boot report file ('-' for stdin)"
        )]
        report: Option<PathBuf>,

        #[arg(long, help = "Capture the boot report from this ISO with xorriso")]
        iso: Option<PathBuf>,

        #[arg(short, long, help = "Directory receiving partition-N.img files")]
        work_dir: PathBuf,

        #[arg(short, long, help = "Medium to extract from (defaults to --iso)")]
        source: Option<PathBuf>,

        #[arg(long, help = "Extract partition images concurrently")]
        parallel: bool,

        #[arg(long, help = "Print the template zlib-compressed and hex-encoded")]
        encode: bool,

        #[arg(long, help = "Print template, images and warnings as JSON")]
        json: bool,
    },

    /// Rebuild an ISO from a modified disk tree
    Build {
        #[arg(short, long, help = "YAML build configuration")]
        config: Option<PathBuf>,

        #[arg(long, required_unless_present = "config")]
        iso: Option<PathBuf>,

        #[arg(long, required_unless_present = "config")]
        tree: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        work_dir: Option<PathBuf>,

        #[arg(long)]
        parallel: bool,

        #[arg(long, help = "Keep extracted partition images after writing")]
        keep_images: bool,

        #[arg(long)]
        no_checksum: bool,

        #[arg(long)]
        json: bool,
    },

    /// Print the El Torito boot report of an ISO
    Report {
        #[arg(short, long)]
        iso: PathBuf,
    },

    /// Compress and hex-encode a template
    Encode {
        #[arg(default_value = "-", help = "Template text ('-' for stdin)")]
        input: String,
    },

    /// Decode a hex-encoded template
    Decode {
        #[arg(default_value = "-", help = "Encoded template ('-' for stdin)")]
        input: String,
    },

    /// Check system prerequisites
    CheckPrereqs,
}
