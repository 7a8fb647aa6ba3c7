//! Timeline Walker
//!
//! Walks a track's component list in timeline order, classifying each
//! component and tracking the cumulative timeline position.

use std::iter::Enumerate;
use std::slice::Iter;

use crate::core::{
    document::{class, Component, ExchangeDocument, SourceMob},
    Length, Position,
};

// =============================================================================
// Classification
// =============================================================================

/// Closed classification of a timeline component
#[derive(Clone, Copy, Debug)]
pub enum ComponentKind<'a> {
    /// Gap
    Filler,
    /// Source clip whose source resolved
    SourceReference { source: &'a SourceMob },
    /// Selector with an active alternative
    Selector { selected: &'a Component },
    /// Effect over input segments
    OperationGroup { inputs: &'a [Component] },
    /// Anything else, including unresolved source clips
    Other,
}

impl ComponentKind<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Filler => "filler",
            ComponentKind::SourceReference { .. } => "sourceReference",
            ComponentKind::Selector { .. } => "selector",
            ComponentKind::OperationGroup { .. } => "operationGroup",
            ComponentKind::Other => "other",
        }
    }
}

/// Classifies a component (first match wins)
pub fn classify<'a, D>(doc: &'a D, component: &'a Component) -> ComponentKind<'a>
where
    D: ExchangeDocument + ?Sized,
{
    match component.class.as_str() {
        class::FILLER => ComponentKind::Filler,
        class::SOURCE_CLIP => component
            .source
            .as_ref()
            .and_then(|reference| doc.resolve_source(reference))
            .map_or(ComponentKind::Other, |source| ComponentKind::SourceReference {
                source,
            }),
        class::SELECTOR => component
            .selected
            .as_deref()
            .map_or(ComponentKind::Other, |selected| ComponentKind::Selector {
                selected,
            }),
        class::OPERATION_GROUP => ComponentKind::OperationGroup {
            inputs: component.input_segments.as_deref().unwrap_or_default(),
        },
        _ => ComponentKind::Other,
    }
}

// =============================================================================
// Walker
// =============================================================================

/// One component visited by the walker
#[derive(Clone, Copy, Debug)]
pub struct WalkStep<'a> {
    /// Index within the track's component list
    pub index: usize,
    pub component: &'a Component,
    pub kind: ComponentKind<'a>,
    /// Cumulative timeline position where the component starts
    pub start: Position,
}

impl WalkStep<'_> {
    pub fn length(&self) -> Length {
        self.component.length
    }
}

/// Iterator over a component list in timeline order
///
/// The position advances by every component's length, annotatable or not,
/// and is never reset.
pub struct TimelineWalker<'a, D: ?Sized> {
    doc: &'a D,
    components: Enumerate<Iter<'a, Component>>,
    position: Position,
}

impl<'a, D> TimelineWalker<'a, D>
where
    D: ExchangeDocument + ?Sized,
{
    pub fn new(doc: &'a D, components: &'a [Component]) -> Self {
        Self {
            doc,
            components: components.iter().enumerate(),
            position: 0,
        }
    }
}

impl<'a, D> Iterator for TimelineWalker<'a, D>
where
    D: ExchangeDocument + ?Sized,
{
    type Item = WalkStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, component) = self.components.next()?;
        let start = self.position;
        self.position = self.position.saturating_add(component.length);
        Some(WalkStep {
            index,
            component,
            kind: classify(self.doc, component),
            start,
        })
    }
}
