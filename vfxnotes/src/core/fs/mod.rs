//! Filesystem utilities.
//!
//! Safe primitives for writing files in a crash-tolerant way. An output
//! document is either fully written or not replaced at all.
//!
//! Windows semantics differ from Unix for rename-over-existing; both are handled.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{CoreError, CoreResult};

// =============================================================================
// Path Validation
// =============================================================================

/// Validates an output document path against the input it is derived from.
///
/// Rejects empty paths, directories, and the input file itself: a run always
/// writes a separate copy.
pub fn validate_output_path(input: &Path, output: &Path) -> CoreResult<PathBuf> {
    if output.as_os_str().is_empty() {
        return Err(CoreError::ValidationError("Output path is empty".to_string()));
    }

    if output.is_dir() {
        return Err(CoreError::ValidationError(format!(
            "Output path points to a directory: {}",
            output.display()
        )));
    }

    let same_file = match (std::fs::canonicalize(input), std::fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same_file {
        return Err(CoreError::ValidationError(format!(
            "Output path must differ from input: {}",
            output.display()
        )));
    }

    Ok(output.to_path_buf())
}

// =============================================================================
// Atomic Writes
// =============================================================================

/// Write bytes to `path` using an atomic replace pattern.
///
/// - Write to a sibling temporary file.
/// - Flush and sync the temp file.
/// - Swap into place by renaming.
/// - If the destination exists, it is first moved aside as a `.bak` file, then removed.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = tmp_path_for(path);
    let written = write_synced(&tmp_path, bytes);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    atomic_replace(path, &tmp_path)
}

/// Write a JSON file atomically with pretty formatting.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}

fn write_synced(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "tmp".to_string());
    tmp.set_file_name(format!(".{file_name}.tmp.{}", ulid::Ulid::new()));
    tmp
}

fn bak_path_for(path: &Path) -> PathBuf {
    let mut bak = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "bak".to_string());
    bak.set_file_name(format!("{file_name}.bak"));
    bak
}

fn atomic_replace(dest: &Path, src_tmp: &Path) -> CoreResult<()> {
    // Fast path: dest does not exist.
    if !dest.exists() {
        return std::fs::rename(src_tmp, dest).map_err(|e| {
            let _ = std::fs::remove_file(src_tmp);
            CoreError::IoError(e)
        });
    }

    let bak = bak_path_for(dest);
    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(src_tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            // Try to restore the old file.
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(src_tmp);
            Err(CoreError::IoError(e))
        }
    }
}
