//! Exchange Document Model
//!
//! Defines the object tree of an editorial exchange document: compositions,
//! track slots, timeline components, source mobs and the data-definition
//! registry. Components are property bags tagged with a class name, the way
//! the container stores them; typed classification happens in the timeline
//! module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{Length, ObjectId, Position, Ratio, RgbColor, SlotId};

/// Component class tags as stored in the document
pub mod class {
    pub const FILLER: &str = "Filler";
    pub const SOURCE_CLIP: &str = "SourceClip";
    pub const SELECTOR: &str = "Selector";
    pub const OPERATION_GROUP: &str = "OperationGroup";
    pub const SEQUENCE: &str = "Sequence";
    pub const TRANSITION: &str = "Transition";
    pub const DESCRIPTIVE_MARKER: &str = "DescriptiveMarker";
}

/// Canonical data definition names
pub mod data_kind {
    pub const PICTURE: &str = "DataDef_Picture";
    pub const SOUND: &str = "DataDef_Sound";
    pub const DESCRIPTIVE_METADATA: &str = "DataDef_DescriptiveMetadata";
}

fn new_object_id() -> ObjectId {
    ulid::Ulid::new().to_string()
}

// =============================================================================
// Data Definitions
// =============================================================================

/// Registered data definition (type registry entry)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TypeDefinition {
    pub const PICTURE_ID: Uuid = Uuid::from_u128(0x01030202_0100_0000_060e_2b34_0401_0101);
    pub const SOUND_ID: Uuid = Uuid::from_u128(0x01030202_0200_0000_060e_2b34_0401_0101);
    pub const DESCRIPTIVE_METADATA_ID: Uuid =
        Uuid::from_u128(0x01030201_1000_0000_060e_2b34_0401_0105);

    pub fn new(id: Uuid, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub fn picture() -> Self {
        Self::new(Self::PICTURE_ID, data_kind::PICTURE, "Picture essence")
    }

    pub fn sound() -> Self {
        Self::new(Self::SOUND_ID, data_kind::SOUND, "Sound essence")
    }

    pub fn descriptive_metadata() -> Self {
        Self::new(
            Self::DESCRIPTIVE_METADATA_ID,
            data_kind::DESCRIPTIVE_METADATA,
            "Descriptive metadata",
        )
    }
}

// =============================================================================
// Document
// =============================================================================

/// Exchange document (root of the object tree)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Application that produced the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default)]
    pub compositions: Vec<Composition>,
    /// Media the timeline components point at
    #[serde(default)]
    pub source_mobs: Vec<SourceMob>,
    #[serde(default)]
    pub data_definitions: Vec<TypeDefinition>,
}

impl Document {
    /// Creates an empty document with the standard data definitions registered
    pub fn new() -> Self {
        Self {
            generator: None,
            compositions: vec![],
            source_mobs: vec![],
            data_definitions: vec![
                TypeDefinition::picture(),
                TypeDefinition::sound(),
                TypeDefinition::descriptive_metadata(),
            ],
        }
    }

    /// Adds a source mob and returns a reference to it
    pub fn add_source_mob(&mut self, name: &str) -> SourceReference {
        let mob = SourceMob::new(name);
        let reference = SourceReference::to(&mob.id);
        self.source_mobs.push(mob);
        reference
    }

    /// Adds a composition to the document
    pub fn add_composition(&mut self, composition: Composition) {
        self.compositions.push(composition);
    }

    /// Gets a source mob by ID
    pub fn get_source_mob(&self, mob_id: &str) -> Option<&SourceMob> {
        self.source_mobs.iter().find(|m| m.id == mob_id)
    }

    /// Iterates the top-level compositions with their storage index
    pub fn toplevel(&self) -> impl Iterator<Item = (usize, &Composition)> {
        self.compositions
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_toplevel())
    }
}

// =============================================================================
// Source Mob
// =============================================================================

/// Source media a clip can point at
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMob {
    pub id: ObjectId,
    pub name: String,
}

impl SourceMob {
    pub fn new(name: &str) -> Self {
        Self {
            id: new_object_id(),
            name: name.to_string(),
        }
    }
}

/// Pointer from a source clip into a source mob
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub source_id: ObjectId,
    #[serde(default)]
    pub source_slot_id: SlotId,
    #[serde(default)]
    pub start_time: Position,
}

impl SourceReference {
    pub fn to(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            source_slot_id: 1,
            start_time: 0,
        }
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Usage code of a composition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UsageCode {
    TopLevel,
    LowerLevel,
    SubClip,
    AdjustedClip,
    Template,
}

/// Composition (editable sequence)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageCode>,
    #[serde(default)]
    pub slots: Vec<TrackSlot>,
}

impl Composition {
    /// Creates a new top-level composition
    pub fn new(name: &str) -> Self {
        Self {
            id: new_object_id(),
            name: name.to_string(),
            usage: Some(UsageCode::TopLevel),
            slots: vec![],
        }
    }

    pub fn with_usage(mut self, usage: UsageCode) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn is_toplevel(&self) -> bool {
        self.usage == Some(UsageCode::TopLevel)
    }

    /// Adds a track slot
    pub fn add_slot(&mut self, slot: TrackSlot) {
        self.slots.push(slot);
    }

    /// Gets a slot by its slot ID
    pub fn get_slot(&self, slot_id: SlotId) -> Option<&TrackSlot> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    /// Highest slot ID in use, if any
    pub fn max_slot_id(&self) -> Option<SlotId> {
        self.slots.iter().map(|s| s.slot_id).max()
    }
}

// =============================================================================
// Track Slot
// =============================================================================

/// Slot storage class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotClass {
    #[default]
    Timeline,
    Event,
    Static,
}

/// Track kind, derived from the slot class and media kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Picture,
    Sound,
    Descriptive,
    EventMarker,
    Other,
}

/// Track slot (typed channel within a composition)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSlot {
    pub slot_id: SlotId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: SlotClass,
    #[serde(default)]
    pub edit_rate: Ratio,
    pub segment: Component,
}

impl TrackSlot {
    /// Creates a timeline slot
    pub fn new_timeline(slot_id: SlotId, name: &str, edit_rate: Ratio, segment: Component) -> Self {
        Self {
            slot_id,
            name: name.to_string(),
            class: SlotClass::Timeline,
            edit_rate,
            segment,
        }
    }

    /// Creates an event slot
    pub fn new_event(slot_id: SlotId, name: &str, edit_rate: Ratio, segment: Component) -> Self {
        Self {
            slot_id,
            name: name.to_string(),
            class: SlotClass::Event,
            edit_rate,
            segment,
        }
    }

    /// Media kind descriptor (the segment's data definition name)
    pub fn media_kind(&self) -> &str {
        &self.segment.data_kind
    }

    /// Classifies the slot
    pub fn kind(&self) -> TrackKind {
        if self.class == SlotClass::Event {
            return TrackKind::EventMarker;
        }
        let media_kind = self.media_kind().to_ascii_lowercase();
        if media_kind.contains("picture") {
            TrackKind::Picture
        } else if media_kind.contains("sound") {
            TrackKind::Sound
        } else if media_kind.contains("descriptive") {
            TrackKind::Descriptive
        } else {
            TrackKind::Other
        }
    }

    /// Component list of the segment, when the segment is a sequence
    pub fn components(&self) -> Option<&[Component]> {
        self.segment.components.as_deref()
    }
}

// =============================================================================
// Component
// =============================================================================

/// Named key/value attribute on a component
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedValue {
    pub name: String,
    pub value: String,
}

impl TaggedValue {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Properties of a descriptive marker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerProperties {
    pub position: Position,
    pub comment: String,
    /// User tag shown by editing applications
    pub user: String,
    pub color: RgbColor,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub marker_id: Uuid,
    /// Slot IDs of the tracks this marker describes
    #[serde(default)]
    pub described_slots: Vec<SlotId>,
}

/// Timeline component (typed property bag)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ObjectId,
    pub class: String,
    #[serde(default)]
    pub data_kind: String,
    #[serde(default)]
    pub length: Length,
    /// SourceClip: referenced source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceReference>,
    /// Selector: active alternative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Box<Component>>,
    /// Selector: inactive alternatives
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<Component>,
    /// OperationGroup: effect identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// OperationGroup: input segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_segments: Option<Vec<Component>>,
    /// Sequence: component list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    /// Component attribute list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<TaggedValue>>,
    /// DescriptiveMarker properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerProperties>,
}

impl Component {
    /// Creates a bare component of the given class
    pub fn new(class: &str, data_kind: &str, length: Length) -> Self {
        Self {
            id: new_object_id(),
            class: class.to_string(),
            data_kind: data_kind.to_string(),
            length,
            source: None,
            selected: None,
            alternates: vec![],
            operation: None,
            input_segments: None,
            components: None,
            attributes: None,
            marker: None,
        }
    }

    /// Creates a picture filler (gap)
    pub fn filler(length: Length) -> Self {
        Self::new(class::FILLER, data_kind::PICTURE, length)
    }

    /// Creates a picture source clip
    pub fn source_clip(source: SourceReference, length: Length) -> Self {
        let mut clip = Self::new(class::SOURCE_CLIP, data_kind::PICTURE, length);
        clip.source = Some(source);
        clip
    }

    /// Creates a selector; its length follows the selected alternative
    pub fn selector(selected: Component, alternates: Vec<Component>) -> Self {
        let mut selector = Self::new(class::SELECTOR, &selected.data_kind, selected.length);
        selector.selected = Some(Box::new(selected));
        selector.alternates = alternates;
        selector
    }

    /// Creates an operation group (effect) over input segments
    pub fn operation_group(operation: &str, inputs: Vec<Component>, length: Length) -> Self {
        let mut group = Self::new(class::OPERATION_GROUP, data_kind::PICTURE, length);
        group.operation = Some(operation.to_string());
        group.input_segments = Some(inputs);
        group
    }

    /// Creates a sequence; its length is the sum of its components
    pub fn sequence(data_kind: &str, components: Vec<Component>) -> Self {
        let length = components
            .iter()
            .fold(0, |total: Length, c| total.saturating_add(c.length));
        let mut sequence = Self::new(class::SEQUENCE, data_kind, length);
        sequence.components = Some(components);
        sequence
    }

    /// Creates a descriptive marker (fixed length of one unit)
    pub fn descriptive_marker(properties: MarkerProperties) -> Self {
        let mut marker = Self::new(class::DESCRIPTIVE_MARKER, data_kind::DESCRIPTIVE_METADATA, 1);
        marker.marker = Some(properties);
        marker
    }

    /// Returns true if the component carries the given class tag
    pub fn is(&self, class: &str) -> bool {
        self.class == class
    }

    /// Looks up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()?
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
