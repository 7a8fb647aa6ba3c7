//! Note Writer
//!
//! Upserts the single reserved note attribute on an annotation target.

use crate::core::document::{Component, ExchangeDocument, TaggedValue};

/// Reserved attribute name editing applications show as the clip note
pub const NOTE_ATTRIBUTE: &str = "_COMMENT";

/// What an upsert did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteWrite {
    Inserted,
    Updated,
}

/// Upserts `attribute` into the target's attribute list by name
///
/// The list is created when absent. Afterwards exactly one attribute with
/// that name exists; later duplicates left by other tools are dropped.
pub fn upsert_attribute(target: &mut Component, attribute: TaggedValue) -> NoteWrite {
    let list = target.attributes.get_or_insert_with(Vec::new);

    let mut found = false;
    list.retain_mut(|existing| {
        if existing.name != attribute.name {
            return true;
        }
        if found {
            return false;
        }
        found = true;
        existing.value.clone_from(&attribute.value);
        true
    });

    if found {
        NoteWrite::Updated
    } else {
        list.push(attribute);
        NoteWrite::Inserted
    }
}

/// Writes `identifier` as the note of `target`
pub fn upsert_note<D: ExchangeDocument>(target: &mut Component, identifier: &str) -> NoteWrite {
    upsert_attribute(target, D::create_attribute(NOTE_ATTRIBUTE, identifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Document;

    fn note_count(component: &Component) -> usize {
        component
            .attributes
            .as_ref()
            .map(|list| list.iter().filter(|a| a.name == NOTE_ATTRIBUTE).count())
            .unwrap_or(0)
    }

    #[test]
    fn test_creates_attribute_list() {
        let mut clip = Component::filler(24);
        assert!(clip.attributes.is_none());

        assert_eq!(upsert_note::<Document>(&mut clip, "VFX0010"), NoteWrite::Inserted);
        assert_eq!(clip.attribute(NOTE_ATTRIBUTE), Some("VFX0010"));
        assert_eq!(note_count(&clip), 1);
    }

    #[test]
    fn test_overwrites_in_place() {
        let mut clip = Component::filler(24);
        clip.attributes = Some(vec![
            TaggedValue::new("_AVID_TAPE", "A001"),
            TaggedValue::new(NOTE_ATTRIBUTE, "old"),
            TaggedValue::new("Color", "Red"),
        ]);

        assert_eq!(upsert_note::<Document>(&mut clip, "VFX0020"), NoteWrite::Updated);

        let names: Vec<_> = clip
            .attributes
            .as_ref()
            .unwrap()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["_AVID_TAPE", NOTE_ATTRIBUTE, "Color"]);
        assert_eq!(clip.attribute(NOTE_ATTRIBUTE), Some("VFX0020"));
    }

    #[test]
    fn test_idempotent() {
        let mut clip = Component::filler(24);
        upsert_note::<Document>(&mut clip, "VFX0010");
        let first = clip.attributes.clone();

        upsert_note::<Document>(&mut clip, "VFX0010");
        assert_eq!(clip.attributes, first);
        assert_eq!(clip.attributes.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_collapses_duplicates() {
        let mut clip = Component::filler(24);
        clip.attributes = Some(vec![
            TaggedValue::new(NOTE_ATTRIBUTE, "a"),
            TaggedValue::new("Other", "x"),
            TaggedValue::new(NOTE_ATTRIBUTE, "b"),
        ]);

        upsert_note::<Document>(&mut clip, "VFX0030");
        assert_eq!(note_count(&clip), 1);
        assert_eq!(clip.attribute(NOTE_ATTRIBUTE), Some("VFX0030"));
        assert_eq!(clip.attributes.as_ref().unwrap().len(), 2);
    }
}
