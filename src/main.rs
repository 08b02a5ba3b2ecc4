// file: src/main.rs
// version: 2.0.0
// guid: h8i9j0k1-l2m3-4567-8901-234567hijklm

//! Ubuntu ISO Customizer - Main entry point

use clap::Parser;
use tokio::signal;
use tracing::{error, warn};
use ubuntu_iso_customizer::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    logging::logger,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.log_json {
        logger::init_json_logger()?;
    } else {
        logger::init_logger(cli.verbose, cli.quiet)?;
    }

    let command_future = async {
        match cli.command {
            Commands::Template {
                report,
                iso,
                work_dir,
                source,
                parallel,
                encode,
                json,
            } => {
                template_command(TemplateOptions {
                    report,
                    iso,
                    work_dir,
                    source,
                    parallel,
                    encode,
                    json,
                })
                .await
            }
            Commands::Build {
                config,
                iso,
                tree,
                output,
                work_dir,
                parallel,
                keep_images,
                no_checksum,
                json,
            } => {
                build_command(BuildOptions {
                    config,
                    iso,
                    tree,
                    output,
                    work_dir,
                    parallel,
                    keep_images,
                    no_checksum,
                    json,
                })
                .await
            }
            Commands::Report { iso } => report_command(&iso).await,
            Commands::Encode { input } => encode_command(&input),
            Commands::Decode { input } => decode_command(&input),
            Commands::CheckPrereqs => check_prerequisites_command().await,
        }
    };

    // Run command with signal handling
    tokio::select! {
        result = command_future => {
            if let Err(e) = &result {
                error!("{}", e);
            }
            result
        }
        interrupted = signal::ctrl_c() => {
            interrupted?;
            warn!("Application interrupted by user");
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}
