//! Annotation Run
//!
//! Orchestrates one run over an opened document: every top-level
//! composition is planned with shared borrows (select, walk, resolve, match)
//! and the plan is then applied with exclusive borrows (notes, markers).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{
    document::ExchangeDocument,
    settings::AnnotationSettings,
    timeline::{find_event_slot, picture_slot_count, resolve_clip, select_picture_slot, TimelineWalker},
    CoreError, CoreResult, SlotId,
};

use super::{
    build_marker, ensure_descriptive_definition, plan_marker, upsert_note, validate_events,
    write_markers, EventMatcher, EventRecord, MarkerPlan, MarkerStyle, MatchOutcome, MatchWarning,
};

/// Inputs of one annotation run
#[derive(Clone, Debug, Default)]
pub struct AnnotationRequest {
    pub events: Vec<EventRecord>,
    pub settings: AnnotationSettings,
}

impl AnnotationRequest {
    pub fn new(events: Vec<EventRecord>, settings: AnnotationSettings) -> Self {
        Self { events, settings }
    }
}

/// Outcome for one processed composition
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionReport {
    pub name: String,
    pub picture_slot_id: SlotId,
    /// Annotatable clips on the picture track
    pub clips_seen: usize,
    pub notes_written: usize,
    pub markers_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_slot_id: Option<SlotId>,
    pub warnings: Vec<MatchWarning>,
}

/// Outcome of a whole run
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReport {
    pub compositions: Vec<CompositionReport>,
    /// Top-level compositions without a picture track
    pub skipped_compositions: Vec<String>,
    /// Whether the descriptive metadata definition had to be registered
    pub registered_descriptive_definition: bool,
    pub started_at: DateTime<Utc>,
}

impl AnnotationReport {
    pub fn notes_written(&self) -> usize {
        self.compositions.iter().map(|c| c.notes_written).sum()
    }

    pub fn markers_written(&self) -> usize {
        self.compositions.iter().map(|c| c.markers_written).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.compositions.iter().map(|c| c.warnings.len()).sum()
    }
}

/// Matched clip, addressed by its index in the picture track
#[derive(Debug)]
struct ClipPlan {
    index: usize,
    identifier: String,
    marker: MarkerPlan,
}

/// Planned changes for one composition
#[derive(Debug)]
struct CompositionPlan {
    composition_index: usize,
    picture_slot_index: usize,
    report: CompositionReport,
    clips: Vec<ClipPlan>,
    has_event_slot: bool,
}

fn plan_composition<D: ExchangeDocument>(
    doc: &D,
    composition_index: usize,
    events: &[EventRecord],
    style: &MarkerStyle,
) -> Option<CompositionPlan> {
    let composition = &doc.compositions()[composition_index];
    let Some(picture_slot_index) = select_picture_slot(composition) else {
        info!("Composition '{}' has no picture track, skipping", composition.name);
        return None;
    };
    if picture_slot_count(composition) > 1 {
        debug!(
            "Composition '{}' has several picture tracks, annotating the first",
            composition.name
        );
    }

    let slot = &composition.slots[picture_slot_index];
    let mut matcher = EventMatcher::new(events);
    let mut clips = Vec::new();

    for step in TimelineWalker::new(doc, slot.components().unwrap_or_default()) {
        let Some(clip) = resolve_clip(doc, &step) else {
            continue;
        };
        match matcher.next_clip() {
            MatchOutcome::Matched { clip_number, event } => {
                debug!(
                    "Clip {}: {} -> {}",
                    clip_number, clip.display_name, event.identifier
                );
                clips.push(ClipPlan {
                    index: clip.index,
                    identifier: event.identifier.clone(),
                    marker: plan_marker(&clip, clip_number, &event.identifier, style.position),
                });
            }
            MatchOutcome::Exhausted { clip_number } => {
                debug!("Clip {}: {} left untouched", clip_number, clip.display_name);
            }
        }
    }

    let warnings = matcher.finish(&composition.name).into_iter().collect();
    Some(CompositionPlan {
        composition_index,
        picture_slot_index,
        report: CompositionReport {
            name: composition.name.clone(),
            picture_slot_id: slot.slot_id,
            clips_seen: matcher.clips_seen(),
            notes_written: 0,
            markers_written: 0,
            event_slot_id: None,
            warnings,
        },
        clips,
        has_event_slot: find_event_slot(composition).is_some(),
    })
}

fn apply_notes<D: ExchangeDocument>(doc: &mut D, plan: &CompositionPlan) -> CoreResult<usize> {
    let components = doc.compositions_mut()[plan.composition_index].slots[plan.picture_slot_index]
        .segment
        .components
        .as_mut()
        .ok_or_else(|| CoreError::Internal("Picture track lost its component list".to_string()))?;

    for clip in &plan.clips {
        let target = components.get_mut(clip.index).ok_or_else(|| {
            CoreError::Internal(format!("Clip index {} out of range", clip.index))
        })?;
        upsert_note::<D>(target, &clip.identifier);
    }
    Ok(plan.clips.len())
}

/// Annotates every top-level composition of `doc`
///
/// The event list is validated before anything is touched. Count mismatches
/// are reported as warnings; only structural failures return an error.
pub fn annotate_document<D: ExchangeDocument>(
    doc: &mut D,
    request: &AnnotationRequest,
) -> CoreResult<AnnotationReport> {
    validate_events(&request.events)?;

    let settings = request.settings.normalized();
    let started_at = Utc::now();
    let style = MarkerStyle::from_settings(&settings.markers, started_at);
    let markers_enabled = settings.markers.enabled;

    let registered_descriptive_definition = markers_enabled && ensure_descriptive_definition(doc);

    let toplevel: Vec<usize> = doc
        .compositions()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_toplevel())
        .map(|(i, _)| i)
        .collect();

    let mut plans = Vec::new();
    let mut skipped_compositions = Vec::new();
    for index in toplevel {
        match plan_composition(doc, index, &request.events, &style) {
            Some(plan) => plans.push(plan),
            None => skipped_compositions.push(doc.compositions()[index].name.clone()),
        }
    }

    let mut compositions = Vec::with_capacity(plans.len());
    for mut plan in plans {
        plan.report.notes_written = apply_notes(doc, &plan)?;

        // With nothing matched an existing marker set is still cleared.
        if markers_enabled && (!plan.clips.is_empty() || plan.has_event_slot) {
            let described = plan.report.picture_slot_id;
            let markers = plan
                .clips
                .iter()
                .map(|clip| build_marker::<D>(&clip.marker, &style, described))
                .collect::<Vec<_>>();
            plan.report.markers_written = markers.len();
            plan.report.event_slot_id = Some(write_markers(
                doc,
                plan.composition_index,
                plan.picture_slot_index,
                markers,
            )?);
        }

        info!(
            "Composition '{}': {} of {} clips annotated",
            plan.report.name, plan.report.notes_written, plan.report.clips_seen
        );
        compositions.push(plan.report);
    }

    Ok(AnnotationReport {
        compositions,
        skipped_compositions,
        registered_descriptive_definition,
        started_at,
    })
}
