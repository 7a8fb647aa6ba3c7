//! Timeline Outline
//!
//! Read-only listing of a composition's picture track, as the annotation run
//! would see it.

use serde::Serialize;

use crate::core::{
    annotate::NOTE_ATTRIBUTE,
    document::{Composition, ExchangeDocument},
    Length, Position, Ratio, SlotId,
};

use super::{resolve_clip, select_picture_slot, TimelineWalker};

/// One component of the picture track
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOutline {
    pub index: usize,
    pub class: String,
    pub kind: &'static str,
    pub start: Position,
    pub length: Length,
    /// 1-based clip number for annotatable components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Existing note value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Picture track listing of a composition
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionOutline {
    pub name: String,
    pub toplevel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_slot_id: Option<SlotId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_rate: Option<Ratio>,
    pub components: Vec<ComponentOutline>,
}

impl CompositionOutline {
    /// Number of annotatable clips
    pub fn clip_count(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.clip_number.is_some())
            .count()
    }
}

/// Lists the picture track of `composition`
pub fn outline_composition<D>(doc: &D, composition: &Composition) -> CompositionOutline
where
    D: ExchangeDocument + ?Sized,
{
    let mut outline = CompositionOutline {
        name: composition.name.clone(),
        toplevel: composition.is_toplevel(),
        picture_slot_id: None,
        edit_rate: None,
        components: vec![],
    };

    let Some(slot) = select_picture_slot(composition).map(|i| &composition.slots[i]) else {
        return outline;
    };
    outline.picture_slot_id = Some(slot.slot_id);
    outline.edit_rate = Some(slot.edit_rate);

    let mut clip_number = 0;
    for step in TimelineWalker::new(doc, slot.components().unwrap_or_default()) {
        let resolved = resolve_clip(doc, &step);
        let number = resolved.as_ref().map(|_| {
            clip_number += 1;
            clip_number
        });
        outline.components.push(ComponentOutline {
            index: step.index,
            class: step.component.class.clone(),
            kind: step.kind.label(),
            start: step.start,
            length: step.length(),
            clip_number: number,
            display_name: resolved.map(|c| c.display_name),
            note: step.component.attribute(NOTE_ATTRIBUTE).map(str::to_string),
        });
    }

    outline
}
