//! Clip Identifier Resolution
//!
//! Decides whether a walked component is a clip that can carry a note, and
//! finds a human-readable source name for it. The name is advisory only: a
//! clip whose name cannot be found is still annotated.

use crate::core::{
    document::{class, Component, ExchangeDocument},
    Length, Position,
};

use super::{ComponentKind, WalkStep};

/// How far below an operation group's inputs the name search descends
const NESTED_NAME_DEPTH: usize = 1;

/// An annotatable clip found on the picture track
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedClip {
    /// Index of the annotation target within the track's component list
    pub index: usize,
    /// Source name, empty when none could be resolved
    pub display_name: String,
    pub start: Position,
    pub length: Length,
}

/// Resolves the annotation target and display name for a walked component
///
/// Returns `None` for components that are not clips (fillers and anything
/// unrecognized). The annotation target is always the walked component itself.
pub fn resolve_clip<D>(doc: &D, step: &WalkStep<'_>) -> Option<ResolvedClip>
where
    D: ExchangeDocument + ?Sized,
{
    let display_name = match step.kind {
        ComponentKind::SourceReference { source } => source.name.clone(),
        ComponentKind::Selector { selected } => source_name(doc, selected).unwrap_or_default(),
        ComponentKind::OperationGroup { inputs } => {
            find_source_name(doc, inputs, 0).unwrap_or_default()
        }
        ComponentKind::Filler | ComponentKind::Other => return None,
    };

    Some(ResolvedClip {
        index: step.index,
        display_name,
        start: step.start,
        length: step.length(),
    })
}

/// Name of the source a component points at, if it is a resolvable source clip
fn source_name<D>(doc: &D, component: &Component) -> Option<String>
where
    D: ExchangeDocument + ?Sized,
{
    if !component.is(class::SOURCE_CLIP) {
        return None;
    }
    let reference = component.source.as_ref()?;
    doc.resolve_source(reference).map(|mob| mob.name.clone())
}

/// First resolvable source name among `segments`, descending into nested
/// component lists up to [`NESTED_NAME_DEPTH`]
fn find_source_name<D>(doc: &D, segments: &[Component], depth: usize) -> Option<String>
where
    D: ExchangeDocument + ?Sized,
{
    for segment in segments {
        if let Some(name) = source_name(doc, segment) {
            return Some(name);
        }
        if depth < NESTED_NAME_DEPTH {
            if let Some(children) = segment.components.as_deref() {
                if let Some(name) = find_source_name(doc, children, depth + 1) {
                    return Some(name);
                }
            }
        }
    }
    None
}
