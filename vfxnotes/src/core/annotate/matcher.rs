//! Event Matcher
//!
//! Pairs the Nth annotatable clip of a composition with the Nth event, by
//! position only.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::EventRecord;

/// Non-fatal clip/event count mismatch
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchWarning {
    /// Clips past the last event were left untouched
    MoreClipsThanEvents { clips: usize, events: usize },
    /// Events past the last clip were not used
    FewerClipsThanEvents { clips: usize, events: usize },
}

impl fmt::Display for MatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchWarning::MoreClipsThanEvents { clips, events } => write!(
                f,
                "more clips ({}) than events ({}), remaining clips left untouched",
                clips, events
            ),
            MatchWarning::FewerClipsThanEvents { clips, events } => {
                write!(f, "fewer clips ({}) than events ({})", clips, events)
            }
        }
    }
}

/// Result of offering one annotatable clip to the matcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome<'e> {
    Matched {
        /// 1-based clip number within the composition
        clip_number: usize,
        event: &'e EventRecord,
    },
    /// The event list ran out; the clip stays untouched
    Exhausted { clip_number: usize },
}

/// Sequential clip-to-event matcher for one composition
#[derive(Debug)]
pub struct EventMatcher<'e> {
    events: &'e [EventRecord],
    counter: usize,
}

impl<'e> EventMatcher<'e> {
    pub fn new(events: &'e [EventRecord]) -> Self {
        Self { events, counter: 0 }
    }

    /// Counts the next annotatable clip and returns its event, if any
    pub fn next_clip(&mut self) -> MatchOutcome<'e> {
        self.counter += 1;
        match self.events.get(self.counter - 1) {
            Some(event) => MatchOutcome::Matched {
                clip_number: self.counter,
                event,
            },
            None => MatchOutcome::Exhausted {
                clip_number: self.counter,
            },
        }
    }

    /// Annotatable clips seen so far
    pub fn clips_seen(&self) -> usize {
        self.counter
    }

    /// Clips paired with an event so far
    pub fn matched(&self) -> usize {
        self.counter.min(self.events.len())
    }

    /// Reports and logs a count mismatch for the finished composition
    pub fn finish(&self, composition: &str) -> Option<MatchWarning> {
        let clips = self.counter;
        let events = self.events.len();
        let warning = if clips > events {
            MatchWarning::MoreClipsThanEvents { clips, events }
        } else if clips < events {
            MatchWarning::FewerClipsThanEvents { clips, events }
        } else {
            return None;
        };
        warn!("Composition '{}': {}", composition, warning);
        Some(warning)
    }
}
