//! Document Access Module
//!
//! Capability interface over an opened exchange document, plus the
//! JSON-backed object tree and file handle that implement it.

mod file;
mod model;

pub use file::*;
pub use model::*;

use uuid::Uuid;

use crate::core::{Ratio, SlotId};

/// Capabilities the annotation run needs from an opened document
///
/// Navigation is exposed as borrowed slices of the object tree. Factories are
/// associated functions so that new objects can be built while parts of the
/// tree are mutably borrowed.
pub trait ExchangeDocument {
    /// Compositions in storage order
    fn compositions(&self) -> &[Composition];

    /// Mutable compositions in storage order
    fn compositions_mut(&mut self) -> &mut [Composition];

    /// Resolves a source reference to the source it points at
    fn resolve_source(&self, reference: &SourceReference) -> Option<&SourceMob>;

    /// Looks up a data definition by its symbolic name
    fn lookup_type_definition(&self, name: &str) -> Option<&TypeDefinition>;

    /// Registers a data definition
    fn register_type_definition(&mut self, id: Uuid, name: &str, description: &str);

    /// Creates a component attribute
    fn create_attribute(name: &str, value: &str) -> TaggedValue
    where
        Self: Sized,
    {
        TaggedValue::new(name, value)
    }

    /// Creates an empty sequence of the given data kind
    fn create_sequence(data_kind: &str) -> Component
    where
        Self: Sized,
    {
        Component::sequence(data_kind, vec![])
    }

    /// Creates an event slot with no name
    fn create_event_slot(slot_id: SlotId, edit_rate: Ratio, segment: Component) -> TrackSlot
    where
        Self: Sized,
    {
        TrackSlot::new_event(slot_id, "", edit_rate, segment)
    }

    /// Creates a descriptive marker
    fn create_marker(properties: MarkerProperties) -> Component
    where
        Self: Sized,
    {
        Component::descriptive_marker(properties)
    }
}

impl ExchangeDocument for Document {
    fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    fn compositions_mut(&mut self) -> &mut [Composition] {
        &mut self.compositions
    }

    fn resolve_source(&self, reference: &SourceReference) -> Option<&SourceMob> {
        self.get_source_mob(&reference.source_id)
    }

    fn lookup_type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.data_definitions.iter().find(|d| d.name == name)
    }

    fn register_type_definition(&mut self, id: Uuid, name: &str, description: &str) {
        let exists = self
            .data_definitions
            .iter()
            .any(|d| d.id == id && d.name == name);
        if !exists {
            self.data_definitions
                .push(TypeDefinition::new(id, name, description));
        }
    }
}
