//! vfxnotes Core Engine
//!
//! Annotation engine over exchange documents: document access, timeline
//! traversal, clip/event matching, notes and markers.

pub mod annotate;
pub mod document;
pub mod fs;
pub mod settings;
pub mod timeline;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod tests_destructive;
