//! CLI command implementations.

pub mod annotate;
pub mod batch;
pub mod init_config;
pub mod inspect;

use std::path::{Path, PathBuf};

use clap::Args;
use vfxnotes_lib::core::{
    annotate::{notes_output_name, AnnotationReport},
    settings::{AnnotationSettings, SettingsStore},
};

use crate::CliError;

/// Marker options shared by the annotating commands.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    /// Settings file (see `init-config`).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Also write one timeline marker per annotated clip.
    #[arg(long)]
    pub markers: bool,

    /// User tag stored on each marker.
    #[arg(long)]
    pub user_tag: Option<String>,

    /// Marker color (green, red, blue, cyan, magenta, yellow, black, white).
    #[arg(long)]
    pub color: Option<String>,

    /// Marker placement on the clip (middle or start).
    #[arg(long)]
    pub position: Option<String>,
}

impl SettingsArgs {
    /// Loads the settings file, if any, and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that is missing or unparsable.
    pub fn resolve(&self) -> Result<AnnotationSettings, CliError> {
        let mut settings = match &self.config {
            Some(path) => SettingsStore::new(path.clone()).try_load().map_err(|e| {
                CliError::InvalidSettings {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => AnnotationSettings::default(),
        };

        if self.markers {
            settings.markers.enabled = true;
        }
        if let Some(user_tag) = &self.user_tag {
            settings.markers.user_tag.clone_from(user_tag);
        }
        if let Some(color) = &self.color {
            settings.markers.color.clone_from(color);
        }
        if let Some(position) = &self.position {
            settings.markers.position.clone_from(position);
        }

        Ok(settings.normalized())
    }
}

/// Default output path: `{stem}_notes.{ext}` next to the input.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy());
    input.with_file_name(notes_output_name(name.as_deref()))
}

/// Prints a run report as indented text.
pub fn print_report_text(output: &Path, report: &AnnotationReport) {
    println!("Annotated {}", output.display());
    for comp in &report.compositions {
        println!(
            "  {}: {} of {} clips annotated, {} markers",
            comp.name, comp.notes_written, comp.clips_seen, comp.markers_written
        );
        for warning in &comp.warnings {
            println!("    warning: {warning}");
        }
    }
    for name in &report.skipped_compositions {
        println!("  {name}: skipped (no picture track)");
    }
    if report.registered_descriptive_definition {
        println!("  registered descriptive metadata definition");
    }
}
