// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Utc;
use phaser_core::{JobId, RunId};

use super::*;

fn sample_run_ref() -> RunRef {
    RunRef::new(JobId::from("job"), RunId::generate(1))
}

#[test]
fn truncate_output_is_a_no_op_under_the_limit() {
    let short = "hello";
    assert_eq!(truncate_output(short), short);
}

#[test]
fn truncate_output_appends_the_suffix_past_the_limit() {
    let long = "x".repeat(MAX_OUTPUT_BYTES + 500);
    let truncated = truncate_output(&long);
    assert!(truncated.len() < long.len());
    assert!(truncated.ends_with(".. (truncated)"));
    assert_eq!(&truncated[..MAX_OUTPUT_BYTES], &long[..MAX_OUTPUT_BYTES]);
}

#[test]
fn phase_transition_event_round_trips_through_json() {
    let event = PhaseTransitionEvent {
        job_run: sample_run_ref(),
        previous_phase: Some(Phase { state: State::Created, timestamp: Utc::now() }),
        new_phase: Phase { state: State::Running, timestamp: Utc::now() },
        ordinal: 1,
    };
    let envelope = Envelope {
        event_metadata: EventMetadata::new(PHASE_EVENT_TYPE),
        instance_metadata: RunMetadata::new(sample_run_ref()),
        event: event.clone(),
    };
    let json = serde_json::to_string(&envelope).expect("serialize");
    let back: Envelope<PhaseTransitionEvent> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.event, event);
    assert_eq!(back.event_metadata.event_type, PHASE_EVENT_TYPE);
}

#[test]
fn output_event_omits_absent_phase_from_json() {
    let event = OutputEvent { phase: None, output: "hi".into(), is_error: false };
    let json = serde_json::to_string(&event).expect("serialize");
    assert!(!json.contains("phase"));
}

#[test]
fn unknown_fields_in_the_event_payload_are_ignored() {
    let json = r#"{"output":"hi","is_error":true,"unexpected":"field"}"#;
    let event: OutputEvent = serde_json::from_str(json).expect("deserialize");
    assert_eq!(event.output, "hi");
    assert!(event.is_error);
}
