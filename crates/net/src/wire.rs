// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format for events sent over the listener sockets: one UTF-8 JSON
//! object per datagram, `{event_metadata, instance_metadata, event}`.

use chrono::{DateTime, Utc};
use phaser_core::{RunMetadata, RunRef, State};
use serde::{Deserialize, Serialize};

/// Event-type discriminants carried in `event_metadata.event_type`, used by
/// receivers to filter before attempting to decode the type-specific payload.
pub const PHASE_EVENT_TYPE: &str = "phase_transition";
pub const OUTPUT_EVENT_TYPE: &str = "output";

/// Output lines longer than this are truncated before dispatch.
pub const MAX_OUTPUT_BYTES: usize = 10_000;
const TRUNCATION_SUFFIX: &str = ".. (truncated)";

/// Truncates `output` to at most [`MAX_OUTPUT_BYTES`] bytes on a char
/// boundary, appending [`TRUNCATION_SUFFIX`] when truncation occurred.
pub fn truncate_output(output: &str) -> String {
    if output.len() <= MAX_OUTPUT_BYTES {
        return output.to_string();
    }
    let mut end = MAX_OUTPUT_BYTES;
    while !output.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &output[..end], TRUNCATION_SUFFIX)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_type: String,
}

impl EventMetadata {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self { event_type: event_type.into() }
    }
}

/// One JSON datagram: a fixed envelope around an event-type-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<E> {
    pub event_metadata: EventMetadata,
    pub instance_metadata: RunMetadata,
    pub event: E,
}

/// A state and the instant it was entered, as carried in a phase transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub state: State,
    pub timestamp: DateTime<Utc>,
}

/// Payload of a phase-transition event. `previous_phase` is absent for the
/// run's first recorded transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransitionEvent {
    pub job_run: RunRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_phase: Option<Phase>,
    pub new_phase: Phase,
    pub ordinal: u64,
}

/// Payload of an output event: a single line plus the phase in effect when
/// it was produced (absent if emitted before the first recorded transition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    pub output: String,
    pub is_error: bool,
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
