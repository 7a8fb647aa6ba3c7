//! Track Selection
//!
//! Finds the picture track a run annotates and the event track that holds
//! its markers.

use std::collections::HashSet;

use crate::core::{
    document::{Composition, TrackKind, TrackSlot},
    SlotId,
};

/// Slot ID given to a new event slot when the composition has no slots
pub const DEFAULT_EVENT_SLOT_ID: SlotId = 1000;

fn is_picture_track(slot: &TrackSlot) -> bool {
    slot.components().is_some() && slot.kind() == TrackKind::Picture
}

/// Index of the first picture slot whose segment carries a component list
pub fn select_picture_slot(composition: &Composition) -> Option<usize> {
    composition.slots.iter().position(is_picture_track)
}

/// Number of slots that would qualify as the picture track
pub fn picture_slot_count(composition: &Composition) -> usize {
    composition.slots.iter().filter(|s| is_picture_track(s)).count()
}

/// Index of the first event (marker) slot
pub fn find_event_slot(composition: &Composition) -> Option<usize> {
    composition
        .slots
        .iter()
        .position(|s| s.kind() == TrackKind::EventMarker)
}

/// Slot ID for a newly created slot: one past the current maximum
///
/// When the maximum is `SlotId::MAX`, the lowest unused ID is taken instead,
/// so the result never collides with an existing slot.
pub fn next_slot_id(composition: &Composition) -> SlotId {
    match composition.max_slot_id() {
        None => DEFAULT_EVENT_SLOT_ID,
        Some(max) => max
            .checked_add(1)
            .unwrap_or_else(|| lowest_unused_slot_id(composition)),
    }
}

fn lowest_unused_slot_id(composition: &Composition) -> SlotId {
    let used: HashSet<SlotId> = composition.slots.iter().map(|s| s.slot_id).collect();
    (1..=SlotId::MAX).find(|id| !used.contains(id)).unwrap_or(0)
}
