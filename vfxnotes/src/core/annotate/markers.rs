//! Marker Planner & Writer
//!
//! Computes one marker per matched clip and materializes the batch on the
//! composition's event track, replacing whatever markers were there.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{
    document::{data_kind, Component, ExchangeDocument, MarkerProperties, TypeDefinition},
    settings::MarkerSettings,
    timeline::{find_event_slot, next_slot_id, ResolvedClip},
    CoreError, CoreResult, Position, RgbColor, SlotId,
};

// =============================================================================
// Placement
// =============================================================================

/// Where on a clip its marker is placed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerPosition {
    /// start + floor(length / 2)
    Middle,
    /// Clip's leading edge
    Start,
}

impl MarkerPosition {
    /// Parses a placement policy; anything but "middle" means start
    pub fn from_policy(policy: &str) -> Self {
        if policy.trim().eq_ignore_ascii_case("middle") {
            MarkerPosition::Middle
        } else {
            MarkerPosition::Start
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerPosition::Middle => "middle",
            MarkerPosition::Start => "start",
        }
    }
}

/// Marker frame for a clip starting at `start` with `length` units
///
/// Saturates at the `Position` range, like the walker's running position.
pub fn marker_frame(start: Position, length: Position, policy: MarkerPosition) -> Position {
    match policy {
        MarkerPosition::Middle => start.saturating_add(length.div_euclid(2)),
        MarkerPosition::Start => start,
    }
}

// =============================================================================
// Colors
// =============================================================================

/// Named marker color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerColor {
    pub label: &'static str,
    pub rgb: RgbColor,
}

const GREEN: MarkerColor = MarkerColor {
    label: "Green",
    rgb: RgbColor::new(0, 65535, 0),
};

static MARKER_COLORS: [(&str, MarkerColor); 8] = [
    ("green", GREEN),
    (
        "red",
        MarkerColor {
            label: "Red",
            rgb: RgbColor::new(65535, 0, 0),
        },
    ),
    (
        "blue",
        MarkerColor {
            label: "Blue",
            rgb: RgbColor::new(0, 0, 65535),
        },
    ),
    (
        "cyan",
        MarkerColor {
            label: "Cyan",
            rgb: RgbColor::new(0, 65535, 65535),
        },
    ),
    (
        "magenta",
        MarkerColor {
            label: "Magenta",
            rgb: RgbColor::new(65535, 0, 65535),
        },
    ),
    (
        "yellow",
        MarkerColor {
            label: "Yellow",
            rgb: RgbColor::new(65535, 65535, 0),
        },
    ),
    (
        "black",
        MarkerColor {
            label: "Black",
            rgb: RgbColor::new(0, 0, 0),
        },
    ),
    (
        "white",
        MarkerColor {
            label: "White",
            rgb: RgbColor::new(65535, 65535, 65535),
        },
    ),
];

static MARKER_COLOR_NAMES: [&str; 8] = [
    "green", "red", "blue", "cyan", "magenta", "yellow", "black", "white",
];

impl MarkerColor {
    /// Resolves a color name; unknown names resolve to green
    pub fn resolve(name: &str) -> MarkerColor {
        let name = name.trim();
        MARKER_COLORS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
            .unwrap_or_else(|| {
                debug!("Unknown marker color '{}', using green", name);
                GREEN
            })
    }

    /// Supported color names
    pub fn names() -> &'static [&'static str] {
        &MARKER_COLOR_NAMES
    }
}

impl Default for MarkerColor {
    fn default() -> Self {
        GREEN
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Marker attributes shared by every marker of one run
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub user_tag: String,
    pub color: MarkerColor,
    pub position: MarkerPosition,
    /// Creation and modification time of every marker
    pub run_started: DateTime<Utc>,
}

impl MarkerStyle {
    pub fn from_settings(settings: &MarkerSettings, run_started: DateTime<Utc>) -> Self {
        Self {
            user_tag: settings.user_tag.clone(),
            color: MarkerColor::resolve(&settings.color),
            position: MarkerPosition::from_policy(&settings.position),
            run_started,
        }
    }
}

/// Planned marker for one matched clip
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerPlan {
    pub clip_number: usize,
    pub position: Position,
    pub identifier: String,
}

/// Plans the marker of a matched clip
pub fn plan_marker(
    clip: &ResolvedClip,
    clip_number: usize,
    identifier: &str,
    policy: MarkerPosition,
) -> MarkerPlan {
    MarkerPlan {
        clip_number,
        position: marker_frame(clip.start, clip.length, policy),
        identifier: identifier.to_string(),
    }
}

/// Builds the marker object for a plan
pub fn build_marker<D: ExchangeDocument>(
    plan: &MarkerPlan,
    style: &MarkerStyle,
    described_slot: SlotId,
) -> Component {
    D::create_marker(MarkerProperties {
        position: plan.position,
        comment: plan.identifier.clone(),
        user: style.user_tag.clone(),
        color: style.color.rgb,
        created_at: style.run_started,
        modified_at: style.run_started,
        marker_id: Uuid::new_v4(),
        described_slots: vec![described_slot],
    })
}

// =============================================================================
// Writing
// =============================================================================

/// Registers the descriptive metadata data definition if the lookup fails
///
/// Documents from some third-party tools spell the definition differently.
/// Returns true when a definition was registered.
pub fn ensure_descriptive_definition<D: ExchangeDocument + ?Sized>(doc: &mut D) -> bool {
    if doc
        .lookup_type_definition(data_kind::DESCRIPTIVE_METADATA)
        .is_some()
    {
        return false;
    }

    let definition = TypeDefinition::descriptive_metadata();
    warn!(
        "Data definition '{}' not found, registering {}",
        definition.name, definition.id
    );
    doc.register_type_definition(definition.id, &definition.name, &definition.description);
    true
}

fn replace_components(segment: &mut Component, markers: Vec<Component>) {
    segment.length = markers.iter().map(|m| m.length).sum();
    segment.components = Some(markers);
}

/// Replaces the composition's marker set with `markers`
///
/// Reuses the first event slot (its segment becomes a sequence if it was
/// not one) or creates one next to the picture track. Returns the event
/// slot ID.
pub fn write_markers<D: ExchangeDocument>(
    doc: &mut D,
    composition_index: usize,
    picture_slot_index: usize,
    markers: Vec<Component>,
) -> CoreResult<SlotId> {
    let composition = doc.compositions().get(composition_index).ok_or_else(|| {
        CoreError::Internal(format!("Composition index {} out of range", composition_index))
    })?;
    let edit_rate = composition
        .slots
        .get(picture_slot_index)
        .map(|slot| slot.edit_rate)
        .ok_or_else(|| {
            CoreError::Internal(format!("Slot index {} out of range", picture_slot_index))
        })?;
    let existing = find_event_slot(composition);
    let new_slot_id = next_slot_id(composition);
    let count = markers.len();

    let slot_id = match existing {
        Some(slot_index) => {
            let slot = &mut doc.compositions_mut()[composition_index].slots[slot_index];
            if slot.segment.components.is_none() {
                slot.segment = D::create_sequence(data_kind::DESCRIPTIVE_METADATA);
            }
            replace_components(&mut slot.segment, markers);
            slot.slot_id
        }
        None => {
            let mut segment = D::create_sequence(data_kind::DESCRIPTIVE_METADATA);
            replace_components(&mut segment, markers);
            let slot = D::create_event_slot(new_slot_id, edit_rate, segment);
            doc.compositions_mut()[composition_index].add_slot(slot);
            new_slot_id
        }
    };

    info!("Wrote {} markers to event slot {}", count, slot_id);
    Ok(slot_id)
}
