//! Annotate command - write VFX IDs into a copy of a document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use vfxnotes_lib::core::annotate::{export_with_notes, load_events};

use super::{default_output_path, print_report_text, SettingsArgs};
use crate::OutputFormat;

/// Arguments for the annotate command.
#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Exchange document to annotate (left unmodified).
    pub input: PathBuf,

    /// JSON array of event rows, each with a "VFX ID" field.
    #[arg(long, short = 'e')]
    pub events: PathBuf,

    /// Output path (default: `<input stem>_notes.<ext>` next to the input).
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Execute the annotate command.
///
/// # Errors
///
/// Returns an error if the events are invalid or the document cannot be
/// opened, annotated or saved. No output file is left behind on failure.
pub fn execute(args: AnnotateArgs, format: OutputFormat) -> Result<()> {
    let events = load_events(&args.events)
        .with_context(|| format!("Failed to load events from {}", args.events.display()))?;
    let settings = args.settings.resolve()?;
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    info!(
        "Annotating {} with {} events (markers {})",
        args.input.display(),
        events.len(),
        if settings.markers.enabled { "on" } else { "off" }
    );

    let report = export_with_notes(&args.input, &output, events, &settings)
        .with_context(|| format!("Failed to annotate {}", args.input.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report_text(&output, &report),
    }
    Ok(())
}
