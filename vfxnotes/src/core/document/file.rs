//! Document File Handle
//!
//! Opens exchange documents from disk and persists them with an atomic
//! write. A handle owns its in-memory copy exclusively.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{fs::atomic_write_json_pretty, CoreError, CoreResult};

use super::{Composition, Document, ExchangeDocument, SourceMob, SourceReference, TypeDefinition};

/// How a document file is opened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    ReadWrite,
}

/// Opened exchange document bound to a file path
#[derive(Debug)]
pub struct DocumentFile {
    path: PathBuf,
    mode: OpenMode,
    document: Document,
}

impl DocumentFile {
    /// Opens a document in place
    pub fn open(path: &Path, mode: OpenMode) -> CoreResult<Self> {
        let document = read_document(path)?;
        info!(
            "Opened document {} ({} compositions)",
            path.display(),
            document.compositions.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            mode,
            document,
        })
    }

    /// Opens a private copy of `input` whose save target is `output`
    ///
    /// Nothing is written to `output` until [`DocumentFile::save`] succeeds.
    pub fn open_copy(input: &Path, output: &Path) -> CoreResult<Self> {
        let document = read_document(input)?;
        info!(
            "Opened copy of {} targeting {}",
            input.display(),
            output.display()
        );
        Ok(Self {
            path: output.to_path_buf(),
            mode: OpenMode::ReadWrite,
            document,
        })
    }

    /// Save target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Persists the document to its save target
    pub fn save(&mut self) -> CoreResult<()> {
        if self.mode == OpenMode::Read {
            return Err(CoreError::DocumentReadOnly(
                self.path.to_string_lossy().to_string(),
            ));
        }
        write_document(&self.path, &self.document)?;
        info!("Saved document {}", self.path.display());
        Ok(())
    }

    /// Closes the handle, discarding unsaved changes
    pub fn close(self) {
        debug!("Closed document {}", self.path.display());
    }
}

impl ExchangeDocument for DocumentFile {
    fn compositions(&self) -> &[Composition] {
        self.document.compositions()
    }

    fn compositions_mut(&mut self) -> &mut [Composition] {
        self.document.compositions_mut()
    }

    fn resolve_source(&self, reference: &SourceReference) -> Option<&SourceMob> {
        self.document.resolve_source(reference)
    }

    fn lookup_type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.document.lookup_type_definition(name)
    }

    fn register_type_definition(&mut self, id: Uuid, name: &str, description: &str) {
        self.document.register_type_definition(id, name, description)
    }
}

fn read_document(path: &Path) -> CoreResult<Document> {
    if !path.exists() {
        return Err(CoreError::DocumentNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let content = fs::read_to_string(path)?;

    serde_json::from_str(&content)
        .map_err(|e| CoreError::DocumentCorrupted(format!("{}: {}", path.display(), e)))
}

fn write_document(path: &Path, document: &Document) -> CoreResult<()> {
    atomic_write_json_pretty(path, document)
        .map_err(|e| CoreError::DocumentSaveFailed(format!("{}: {}", path.display(), e)))
}
