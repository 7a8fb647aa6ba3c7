//! Init-config command - write a default settings file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use vfxnotes_lib::core::settings::{AnnotationSettings, SettingsStore, SETTINGS_FILE};

use crate::{CliError, OutputFormat};

/// Arguments for the init-config command.
#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Settings file to write; a directory gets `vfxnotes.json` inside it.
    #[arg(default_value = SETTINGS_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Execute the init-config command.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
pub fn execute(args: &InitConfigArgs, format: OutputFormat) -> Result<()> {
    let store = if args.path.is_dir() {
        SettingsStore::in_dir(&args.path)
    } else {
        SettingsStore::new(args.path.clone())
    };

    if store.settings_path().exists() && !args.force {
        return Err(CliError::SettingsExist(store.settings_path().to_path_buf()).into());
    }

    let settings = store
        .save(&AnnotationSettings::default())
        .map_err(CliError::from)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Text => println!("Wrote {}", store.settings_path().display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_defaults_into_directory() {
        let dir = TempDir::new().unwrap();
        let args = InitConfigArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        execute(&args, OutputFormat::Text).unwrap();

        let store = SettingsStore::in_dir(dir.path());
        assert!(store.settings_path().exists());
        assert_eq!(store.load(), AnnotationSettings::default());
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, "{}").unwrap();

        let mut args = InitConfigArgs { path, force: false };
        let err = execute(&args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        args.force = true;
        execute(&args, OutputFormat::Text).unwrap();
    }
}
