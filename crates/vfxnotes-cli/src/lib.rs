//! # vfxnotes-cli
//!
//! Command-line interface for annotating exchange documents with VFX IDs.
//!
//! ## Commands
//!
//! - `vfxnotes annotate` - Write clip notes (and markers) into a copy of a document
//! - `vfxnotes inspect` - List the picture track of every top-level composition
//! - `vfxnotes batch` - Annotate several documents concurrently from a manifest
//! - `vfxnotes init-config` - Write a default settings file
//!
//! ## Logging
//!
//! `RUST_LOG` controls verbosity (default `info`); `--log-dir` adds a daily
//! rolling log file.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

/// VFX Notes - write VFX IDs into editorial exchange documents.
#[derive(Debug, Parser)]
#[command(name = "vfxnotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory for a daily rolling log file.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Annotate a copy of a document with VFX IDs.
    Annotate(commands::annotate::AnnotateArgs),
    /// List the picture track of every top-level composition.
    Inspect(commands::inspect::InspectArgs),
    /// Annotate several documents from a JSON manifest.
    Batch(commands::batch::BatchArgs),
    /// Write a default settings file.
    InitConfig(commands::init_config::InitConfigArgs),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// CLI-level failures that are not engine errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Batch manifest {path} is invalid: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Batch manifest {0} lists no jobs")]
    EmptyManifest(PathBuf),

    #[error("{failed} of {total} batch jobs failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("Settings file {path} could not be loaded: {reason}")]
    InvalidSettings { path: PathBuf, reason: String },

    #[error("Settings file already exists: {0} (use --force to overwrite)")]
    SettingsExist(PathBuf),

    #[error("{0}")]
    Core(String),
}

impl From<vfxnotes_lib::core::CoreError> for CliError {
    fn from(e: vfxnotes_lib::core::CoreError) -> Self {
        CliError::Core(e.to_ipc_error())
    }
}
