//! VFX Notes CLI - annotate exchange documents from the command line.
//!
//! The main entry point for the `vfxnotes` binary.

use anyhow::Result;
use clap::Parser;

use vfxnotes_cli::{commands, logging::init_logging, Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Held until exit so the log file is flushed
    let _log_guard = init_logging(cli.log_dir.as_deref());

    let format = cli.format;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Annotate(args) => commands::annotate::execute(args, format),
            Commands::Inspect(args) => commands::inspect::execute(&args, format),
            Commands::Batch(args) => commands::batch::execute(args, format).await,
            Commands::InitConfig(args) => commands::init_config::execute(&args, format),
        }
    })
}
