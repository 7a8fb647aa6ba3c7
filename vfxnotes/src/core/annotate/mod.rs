//! Annotation Module
//!
//! Pairs picture track clips with VFX events, writes the clip notes and
//! optionally the matching timeline markers.

mod engine;
mod events;
mod export;
mod markers;
mod matcher;
mod notes;

pub use engine::*;
pub use events::*;
pub use export::*;
pub use markers::*;
pub use matcher::*;
pub use notes::*;
