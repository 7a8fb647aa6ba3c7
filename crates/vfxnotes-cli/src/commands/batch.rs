//! Batch command - annotate several documents concurrently.
//!
//! Every job opens its own private copy of its input, so jobs never share
//! document state and run on the blocking pool side by side.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use vfxnotes_lib::core::{
    annotate::{export_with_notes, load_events, AnnotationReport},
    settings::AnnotationSettings,
};

use super::{default_output_path, print_report_text, SettingsArgs};
use crate::{CliError, OutputFormat};

/// Arguments for the batch command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON manifest: `[{"input": ..., "events": ..., "output": ...}]`.
    /// Relative paths are resolved against the manifest's directory.
    pub manifest: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchJob {
    pub input: PathBuf,
    pub events: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl BatchJob {
    fn resolve_against(mut self, base: &Path) -> Self {
        self.input = base.join(&self.input);
        self.events = base.join(&self.events);
        self.output = self.output.map(|o| base.join(o));
        self
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// Outcome of one job.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnnotationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reads and validates a batch manifest.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, is not a JSON job list,
/// lists no jobs, or two jobs would write the same file.
pub fn load_manifest(path: &Path) -> Result<Vec<BatchJob>, CliError> {
    let invalid = |reason: String| CliError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let jobs: Vec<BatchJob> = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    if jobs.is_empty() {
        return Err(CliError::EmptyManifest(path.to_path_buf()));
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let jobs: Vec<BatchJob> = jobs.into_iter().map(|job| job.resolve_against(base)).collect();
    check_output_conflicts(&jobs).map_err(invalid)?;
    Ok(jobs)
}

/// Jobs run concurrently, so no output may be shared or be another job's input.
fn check_output_conflicts(jobs: &[BatchJob]) -> Result<(), String> {
    let inputs: HashSet<PathBuf> = jobs.iter().map(|job| job.input.clone()).collect();
    let mut outputs = HashSet::with_capacity(jobs.len());

    for job in jobs {
        let output = job.output_path();
        if inputs.contains(&output) {
            return Err(format!(
                "output {} is also a job input",
                output.display()
            ));
        }
        if !outputs.insert(output.clone()) {
            return Err(format!(
                "output {} is written by more than one job",
                output.display()
            ));
        }
    }
    Ok(())
}

fn run_job(job: &BatchJob, settings: &AnnotationSettings) -> Result<AnnotationReport, CliError> {
    let events = load_events(&job.events)?;
    Ok(export_with_notes(
        &job.input,
        &job.output_path(),
        events,
        settings,
    )?)
}

/// Runs every job of a manifest and collects the outcomes in manifest order.
pub async fn run_jobs(jobs: Vec<BatchJob>, settings: AnnotationSettings) -> Vec<BatchOutcome> {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let settings = settings.clone();
            tokio::task::spawn_blocking(move || {
                let result = run_job(&job, &settings);
                (job, result)
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = match handle.await {
            Ok((job, Ok(report))) => BatchOutcome {
                output: job.output_path(),
                input: job.input,
                report: Some(report),
                error: None,
            },
            Ok((job, Err(e))) => {
                error!("Batch job {} failed: {}", job.input.display(), e);
                BatchOutcome {
                    output: job.output_path(),
                    input: job.input,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
            Err(e) => {
                error!("Batch job panicked: {}", e);
                BatchOutcome {
                    input: PathBuf::new(),
                    output: PathBuf::new(),
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the manifest is invalid or any job failed. Jobs that
/// succeeded keep their outputs.
pub async fn execute(args: BatchArgs, format: OutputFormat) -> Result<()> {
    let jobs = load_manifest(&args.manifest)?;
    let settings = args.settings.resolve()?;
    let total = jobs.len();
    info!("Running {} batch jobs from {}", total, args.manifest.display());

    let outcomes = run_jobs(jobs, settings).await;
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputFormat::Text => {
            for outcome in &outcomes {
                match (&outcome.report, &outcome.error) {
                    (Some(report), _) => print_report_text(&outcome.output, report),
                    (None, Some(e)) => println!("Failed {}: {e}", outcome.input.display()),
                    (None, None) => {}
                }
            }
            println!("{} of {} jobs succeeded", total - failed, total);
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use vfxnotes_lib::core::document::{
        data_kind, Component, Composition, Document, TrackSlot,
    };
    use vfxnotes_lib::core::Ratio;

    fn write_document(dir: &Path, name: &str) {
        let mut doc = Document::new();
        let a = doc.add_source_mob("A");
        let b = doc.add_source_mob("B");
        let mut comp = Composition::new("Edit");
        comp.add_slot(TrackSlot::new_timeline(
            1,
            "V1",
            Ratio::new(24, 1),
            Component::sequence(
                data_kind::PICTURE,
                vec![Component::source_clip(a, 24), Component::source_clip(b, 24)],
            ),
        ));
        doc.add_composition(comp);
        fs::write(dir.join(name), serde_json::to_string(&doc).unwrap()).unwrap();
    }

    #[test]
    fn test_load_manifest_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("jobs.json");
        fs::write(
            &manifest,
            r#"[{"input": "reel1.aaf", "events": "reel1.json"},
                {"input": "/abs/reel2.aaf", "events": "e.json", "output": "out/reel2.aaf"}]"#,
        )
        .unwrap();

        let jobs = load_manifest(&manifest).unwrap();
        assert_eq!(jobs[0].input, dir.path().join("reel1.aaf"));
        assert_eq!(jobs[0].output_path(), dir.path().join("reel1_notes.aaf"));
        assert_eq!(jobs[1].input, PathBuf::from("/abs/reel2.aaf"));
        assert_eq!(jobs[1].output_path(), dir.path().join("out/reel2.aaf"));
    }

    #[test]
    fn test_load_manifest_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("jobs.json");

        fs::write(&manifest, "[]").unwrap();
        assert!(matches!(
            load_manifest(&manifest),
            Err(CliError::EmptyManifest(_))
        ));

        fs::write(&manifest, "{").unwrap();
        assert!(matches!(
            load_manifest(&manifest),
            Err(CliError::InvalidManifest { .. })
        ));
    }

    #[test]
    fn test_load_manifest_rejects_shared_outputs() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("jobs.json");

        // The second job's default output collides with the first job's explicit one
        fs::write(
            &manifest,
            r#"[{"input": "reel1.aaf", "events": "a.json", "output": "reel2_notes.aaf"},
                {"input": "reel2.aaf", "events": "b.json"}]"#,
        )
        .unwrap();
        let err = load_manifest(&manifest).unwrap_err();
        assert!(matches!(err, CliError::InvalidManifest { .. }));
        assert!(err.to_string().contains("more than one job"));

        fs::write(
            &manifest,
            r#"[{"input": "reel1.aaf", "events": "a.json", "output": "reel2.aaf"},
                {"input": "reel2.aaf", "events": "b.json"}]"#,
        )
        .unwrap();
        let err = load_manifest(&manifest).unwrap_err();
        assert!(err.to_string().contains("also a job input"));

        fs::write(
            &manifest,
            r#"[{"input": "reel1.aaf", "events": "a.json"},
                {"input": "reel2.aaf", "events": "a.json"}]"#,
        )
        .unwrap();
        assert_eq!(load_manifest(&manifest).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_jobs_isolates_failures() {
        let dir = TempDir::new().unwrap();
        write_document(dir.path(), "reel1.aaf");
        write_document(dir.path(), "reel2.aaf");
        fs::write(dir.path().join("good.json"), r#"[{"VFX ID": "VFX0010"}]"#).unwrap();
        fs::write(dir.path().join("empty.json"), "[]").unwrap();

        let jobs = vec![
            BatchJob {
                input: dir.path().join("reel1.aaf"),
                events: dir.path().join("good.json"),
                output: None,
            },
            BatchJob {
                input: dir.path().join("reel2.aaf"),
                events: dir.path().join("empty.json"),
                output: None,
            },
        ];

        let outcomes = run_jobs(jobs, AnnotationSettings::default()).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].report.as_ref().unwrap().notes_written(), 1);
        assert!(dir.path().join("reel1_notes.aaf").exists());
        assert!(outcomes[1].error.is_some());
        assert!(!dir.path().join("reel2_notes.aaf").exists());
    }
}
