//! Test fixtures shared by the core test modules

use crate::core::{
    annotate::NOTE_ATTRIBUTE,
    document::{data_kind, Component, Composition, Document, TrackSlot},
    timeline::{find_event_slot, select_picture_slot},
    Length, Position, Ratio, SlotId,
};

/// Picture slot over `components` at 24 fps
pub fn picture_slot(slot_id: SlotId, components: Vec<Component>) -> TrackSlot {
    TrackSlot::new_timeline(
        slot_id,
        "V1",
        Ratio::new(24, 1),
        Component::sequence(data_kind::PICTURE, components),
    )
}

/// Single top-level composition holding one picture slot
pub fn single_track_document(components: impl FnOnce(&mut Document) -> Vec<Component>) -> Document {
    let mut doc = Document::new();
    let components = components(&mut doc);
    let mut comp = Composition::new("Edit");
    comp.add_slot(picture_slot(1, components));
    doc.add_composition(comp);
    doc
}

/// `[Filler(10), SourceClip("A", 24), SourceClip("B", 24)]`
pub fn scenario_document() -> Document {
    single_track_document(|doc| {
        let a = doc.add_source_mob("A");
        let b = doc.add_source_mob("B");
        vec![
            Component::filler(10),
            Component::source_clip(a, 24),
            Component::source_clip(b, 24),
        ]
    })
}

/// One source clip per name, each `length` long
pub fn clips_document(names: &[&str], length: Length) -> Document {
    single_track_document(|doc| {
        names
            .iter()
            .map(|name| Component::source_clip(doc.add_source_mob(name), length))
            .collect()
    })
}

fn picture_components(doc: &Document, composition: usize) -> &[Component] {
    let comp = &doc.compositions[composition];
    select_picture_slot(comp)
        .and_then(|i| comp.slots[i].components())
        .unwrap_or_default()
}

/// Note value of every picture track component, in timeline order
pub fn notes(doc: &Document, composition: usize) -> Vec<Option<String>> {
    picture_components(doc, composition)
        .iter()
        .map(|c| c.attribute(NOTE_ATTRIBUTE).map(str::to_string))
        .collect()
}

/// `(position, comment)` of every marker on the event slot
pub fn markers(doc: &Document, composition: usize) -> Vec<(Position, String)> {
    let comp = &doc.compositions[composition];
    let Some(slot) = find_event_slot(comp).map(|i| &comp.slots[i]) else {
        return vec![];
    };
    slot.components()
        .unwrap_or_default()
        .iter()
        .filter_map(|c| c.marker.as_ref())
        .map(|m| (m.position, m.comment.clone()))
        .collect()
}
