//! Inspect command - list picture tracks as the annotation run sees them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vfxnotes_lib::core::{
    document::{DocumentFile, OpenMode},
    timeline::{outline_composition, CompositionOutline},
};

use crate::OutputFormat;

/// Arguments for the inspect command.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Exchange document to inspect.
    pub input: PathBuf,

    /// Include lower-level compositions.
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Execute the inspect command.
///
/// # Errors
///
/// Returns an error if the document cannot be opened.
pub fn execute(args: &InspectArgs, format: OutputFormat) -> Result<()> {
    let file = DocumentFile::open(&args.input, OpenMode::Read)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let doc = file.document();
    let outlines: Vec<CompositionOutline> = doc
        .compositions
        .iter()
        .filter(|c| args.all || c.is_toplevel())
        .map(|c| outline_composition(doc, c))
        .collect();
    file.close();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outlines)?),
        OutputFormat::Text => print_outlines(&outlines),
    }
    Ok(())
}

fn print_outlines(outlines: &[CompositionOutline]) {
    if outlines.is_empty() {
        println!("No compositions found");
        return;
    }

    for outline in outlines {
        let Some(slot_id) = outline.picture_slot_id else {
            println!("{}: no picture track", outline.name);
            continue;
        };
        let rate = outline
            .edit_rate
            .map(|r| r.to_string())
            .unwrap_or_default();
        println!(
            "{} (slot {}, {} fps, {} clips)",
            outline.name,
            slot_id,
            rate,
            outline.clip_count()
        );

        for item in &outline.components {
            let number = item
                .clip_number
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            println!(
                "  {:>4} {:>8} +{:<6} {:<16} {:<20} {}",
                number,
                item.start,
                item.length,
                item.kind,
                item.display_name.as_deref().unwrap_or(""),
                item.note.as_deref().unwrap_or("")
            );
        }
    }
}
