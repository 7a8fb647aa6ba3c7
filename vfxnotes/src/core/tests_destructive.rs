//! Destructive and Edge Case Tests for the Annotation Engine
//!
//! These tests verify the robustness of the run against malformed documents,
//! degenerate timelines and hostile inputs.

use crate::core::annotate::{
    annotate_document, events_from_ids, marker_frame, parse_events, AnnotationRequest,
    MarkerPosition, NOTE_ATTRIBUTE,
};
use crate::core::document::{
    data_kind, Component, Composition, Document, DocumentFile, ExchangeDocument, OpenMode,
    TaggedValue, TrackSlot,
};
use crate::core::fixtures::{markers, notes, picture_slot, scenario_document, single_track_document};
use crate::core::settings::AnnotationSettings;
use crate::core::timeline::{next_slot_id, DEFAULT_EVENT_SLOT_ID};
use crate::core::{CoreError, Ratio};

fn with_markers(ids: &[&str]) -> AnnotationRequest {
    let mut settings = AnnotationSettings::default();
    settings.markers.enabled = true;
    AnnotationRequest::new(events_from_ids(ids), settings)
}

#[test]
fn test_destructive_ratio_division_by_zero() {
    let r = Ratio::new(25, 0);
    assert_eq!(r.den, 1);
    assert_eq!(r.as_f64(), 25.0);
}

#[test]
fn test_destructive_negative_and_zero_lengths() {
    // Odd lengths floor, negative lengths floor toward negative infinity
    assert_eq!(marker_frame(0, 1, MarkerPosition::Middle), 0);
    assert_eq!(marker_frame(100, 0, MarkerPosition::Middle), 100);
    assert_eq!(marker_frame(100, -3, MarkerPosition::Middle), 98);

    let mut doc = single_track_document(|doc| {
        let a = doc.add_source_mob("A");
        let b = doc.add_source_mob("B");
        vec![
            Component::filler(-4),
            Component::source_clip(a, 0),
            Component::source_clip(b, 10),
        ]
    });
    annotate_document(&mut doc, &with_markers(&["X", "Y"])).unwrap();

    assert_eq!(
        markers(&doc, 0),
        vec![(-4, "X".to_string()), (1, "Y".to_string())]
    );
}

#[test]
fn test_destructive_empty_picture_track() {
    let mut doc = single_track_document(|_| vec![]);
    let report = annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();

    let comp = &report.compositions[0];
    assert_eq!(comp.clips_seen, 0);
    assert_eq!(comp.notes_written, 0);
    // No marker track is created for an empty match set
    assert_eq!(comp.event_slot_id, None);
    assert_eq!(doc.compositions[0].slots.len(), 1);
}

#[test]
fn test_destructive_zero_matches_clears_existing_markers() {
    let mut doc = scenario_document();
    annotate_document(&mut doc, &with_markers(&["VFX0010", "VFX0020"])).unwrap();
    assert_eq!(markers(&doc, 0).len(), 2);

    // Replace the clips with gaps; the old marker set must not survive.
    doc.compositions[0].slots[0].segment = Component::sequence(
        data_kind::PICTURE,
        vec![Component::filler(48)],
    );
    let report = annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();

    assert!(markers(&doc, 0).is_empty());
    assert_eq!(report.compositions[0].markers_written, 0);
    assert_eq!(report.compositions[0].event_slot_id, Some(2));
}

#[test]
fn test_destructive_only_fillers_and_unknown_components() {
    let mut doc = single_track_document(|_| {
        vec![
            Component::filler(10),
            Component::new("Transition", data_kind::PICTURE, 5),
            Component::new("SomethingNew", data_kind::PICTURE, 7),
            Component::selector(Component::filler(3), vec![]),
        ]
    });

    // The selector over a gap still counts; the unknown components never do.
    let report = annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();
    assert_eq!(report.compositions[0].clips_seen, 1);
    assert_eq!(notes(&doc, 0)[3].as_deref(), Some("VFX0010"));
    assert_eq!(markers(&doc, 0), vec![(22 + 1, "VFX0010".to_string())]);
}

#[test]
fn test_destructive_dangling_source_reference() {
    let mut doc = single_track_document(|doc| {
        let a = doc.add_source_mob("A");
        vec![
            Component::source_clip(crate::core::document::SourceReference::to("gone"), 24),
            Component::source_clip(a, 24),
        ]
    });

    annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();
    assert_eq!(notes(&doc, 0), vec![None, Some("VFX0010".to_string())]);
    assert_eq!(markers(&doc, 0), vec![(36, "VFX0010".to_string())]);
}

#[test]
fn test_destructive_selector_without_selection() {
    let mut selector = Component::selector(Component::filler(24), vec![]);
    selector.selected = None;
    let mut doc = single_track_document(|_| vec![selector]);

    let report = annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();
    assert_eq!(report.compositions[0].clips_seen, 0);
}

#[test]
fn test_destructive_duplicate_notes_collapsed() {
    let mut doc = scenario_document();
    let clip = &mut doc.compositions[0].slots[0].segment.components.as_mut().unwrap()[1];
    clip.attributes = Some(vec![
        TaggedValue::new(NOTE_ATTRIBUTE, "stale 1"),
        TaggedValue::new("_AVID_TAPE", "A001"),
        TaggedValue::new(NOTE_ATTRIBUTE, "stale 2"),
    ]);

    annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();

    let clip = &doc.compositions[0].slots[0].components().unwrap()[1];
    let attributes = clip.attributes.as_ref().unwrap();
    assert_eq!(attributes.len(), 2);
    assert_eq!(clip.attribute(NOTE_ATTRIBUTE), Some("VFX0010"));
}

#[test]
fn test_destructive_picture_segment_not_a_sequence() {
    let mut doc = Document::new();
    let a = doc.add_source_mob("A");
    let mut comp = Composition::new("Edit");
    comp.add_slot(TrackSlot::new_timeline(
        1,
        "V1",
        Ratio::new(24, 1),
        Component::source_clip(a, 24),
    ));
    doc.add_composition(comp);

    let report = annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();
    assert!(report.compositions.is_empty());
    assert_eq!(report.skipped_compositions, vec!["Edit".to_string()]);
}

#[test]
fn test_destructive_second_picture_track_ignored() {
    let mut doc = scenario_document();
    let c = doc.add_source_mob("C");
    doc.compositions[0].add_slot(picture_slot(7, vec![Component::source_clip(c, 24)]));

    let report = annotate_document(&mut doc, &with_markers(&["VFX0010", "VFX0020"])).unwrap();
    assert_eq!(report.compositions[0].picture_slot_id, 1);

    let second = &doc.compositions[0].slots[1].components().unwrap()[0];
    assert!(second.attribute(NOTE_ATTRIBUTE).is_none());
    assert_eq!(report.compositions[0].event_slot_id, Some(8));
}

#[test]
fn test_destructive_slot_id_overflow() {
    let mut comp = Composition::new("Edit");
    assert_eq!(next_slot_id(&comp), DEFAULT_EVENT_SLOT_ID);

    comp.add_slot(picture_slot(u32::MAX, vec![]));
    assert_ne!(next_slot_id(&comp), u32::MAX);

    // A marker track next to a picture track at the maximum ID stays unique
    let mut doc = scenario_document();
    doc.compositions[0].slots[0].slot_id = u32::MAX;
    let report = annotate_document(&mut doc, &with_markers(&["VFX0010"])).unwrap();

    let ids: Vec<_> = doc.compositions[0].slots.iter().map(|s| s.slot_id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(report.compositions[0].event_slot_id, Some(ids[1]));
    let slot = &doc.compositions[0].slots[1];
    let marker = slot.components().unwrap()[0].marker.as_ref().unwrap();
    assert_eq!(marker.described_slots, vec![u32::MAX]);
}

#[test]
fn test_destructive_timeline_position_overflow() {
    let mut doc = single_track_document(|doc| {
        let a = doc.add_source_mob("A");
        let b = doc.add_source_mob("B");
        vec![
            Component::filler(i64::MAX - 5),
            Component::source_clip(a, 24),
            Component::source_clip(b, 24),
        ]
    });

    let report = annotate_document(&mut doc, &with_markers(&["VFX0010", "VFX0020"])).unwrap();

    assert_eq!(report.compositions[0].notes_written, 2);
    assert_eq!(
        markers(&doc, 0),
        vec![(i64::MAX, "VFX0010".to_string()), (i64::MAX, "VFX0020".to_string())]
    );
}

#[test]
fn test_destructive_hostile_identifiers() {
    let long = "X".repeat(10_000);
    let ids = ["VFX\"0010\n", "ＶＦＸ００２０", long.as_str()];
    let mut doc = clips(3);

    annotate_document(&mut doc, &with_markers(&ids)).unwrap();

    let json = serde_json::to_string(&doc).unwrap();
    let reloaded: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(notes(&reloaded, 0)[0].as_deref(), Some("VFX\"0010\n"));
    assert_eq!(notes(&reloaded, 0)[1].as_deref(), Some("ＶＦＸ００２０"));
    assert_eq!(notes(&reloaded, 0)[2].as_ref().map(String::len), Some(10_000));
}

fn clips(count: usize) -> Document {
    single_track_document(|doc| {
        (0..count)
            .map(|i| Component::source_clip(doc.add_source_mob(&format!("clip{}", i)), 24))
            .collect()
    })
}

#[test]
fn test_destructive_malformed_event_payloads() {
    assert!(matches!(parse_events(""), Err(CoreError::InvalidEvents(_))));
    assert!(matches!(parse_events("{}"), Err(CoreError::InvalidEvents(_))));
    assert!(matches!(
        parse_events(r#"[{"VFX ID": 10}]"#),
        Err(CoreError::InvalidEvents(_))
    ));
    assert!(matches!(
        parse_events(r#"[{"VFX ID": ""}]"#),
        Err(CoreError::ValidationError(_))
    ));
}

#[test]
fn test_destructive_read_only_handle_refuses_save() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("edit.aaf");
    std::fs::write(&path, serde_json::to_string(&scenario_document()).unwrap()).unwrap();

    let mut file = DocumentFile::open(&path, OpenMode::Read).unwrap();
    annotate_document(&mut file, &with_markers(&["VFX0010"])).unwrap();
    assert_eq!(file.compositions().len(), 1);

    let err = file.save().unwrap_err();
    assert!(matches!(err, CoreError::DocumentReadOnly(_)));
    let on_disk: Document = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(notes(&on_disk, 0)[1], None);
}
