//! Annotated Export
//!
//! Produces an annotated copy of an input document. The input is never
//! modified, and a failed run leaves no half-annotated output behind.

use std::path::Path;

use tracing::{error, info, warn};

use crate::core::{
    document::DocumentFile, fs::validate_output_path, settings::AnnotationSettings, CoreResult,
};

use super::{annotate_document, AnnotationReport, AnnotationRequest, EventRecord};

/// Download name used when the input name is unknown
pub const DEFAULT_OUTPUT_NAME: &str = "output_notes.aaf";

/// Output file name for an annotated copy of `file_name`: `{stem}_notes.{ext}`,
/// with `aaf` when the name has no extension
pub fn notes_output_name(file_name: Option<&str>) -> String {
    let Some(name) = file_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return DEFAULT_OUTPUT_NAME.to_string();
    };

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}_notes.{}", stem, ext.to_string_lossy()),
        None => format!("{}_notes.aaf", stem),
    }
}

/// Annotates a private copy of `input` and saves it to `output`
///
/// On any failure an output created by this run is removed; a file that
/// already existed at `output` is left as it was.
pub fn export_with_notes(
    input: &Path,
    output: &Path,
    events: Vec<EventRecord>,
    settings: &AnnotationSettings,
) -> CoreResult<AnnotationReport> {
    let output = validate_output_path(input, output)?;
    let preexisting = output.exists();

    match annotate_copy(input, &output, events, settings) {
        Ok(report) => {
            info!(
                "Exported {} with {} notes and {} markers",
                output.display(),
                report.notes_written(),
                report.markers_written()
            );
            Ok(report)
        }
        Err(e) => {
            error!("Export to {} failed: {}", output.display(), e);
            // A file that was there before the run is never ours to remove.
            if !preexisting {
                discard_output(&output);
            }
            Err(e)
        }
    }
}

fn annotate_copy(
    input: &Path,
    output: &Path,
    events: Vec<EventRecord>,
    settings: &AnnotationSettings,
) -> CoreResult<AnnotationReport> {
    let mut file = DocumentFile::open_copy(input, output)?;
    let request = AnnotationRequest::new(events, settings.clone());
    let report = annotate_document(&mut file, &request)?;
    file.save()?;
    file.close();
    Ok(report)
}

fn discard_output(output: &Path) {
    if output.exists() {
        if let Err(e) = std::fs::remove_file(output) {
            warn!("Failed to remove output {}: {}", output.display(), e);
        }
    }
}
