// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::os::unix::net::UnixDatagram;

use phaser_core::{Clock, FakeClock, JobId, Lifecycle, OutputRing, RunId, RunMetadata, RunRef, State, TaskTracker};

use super::*;
use crate::wire::Envelope;

fn sample_metadata() -> RunMetadata {
    RunMetadata::new(RunRef::new(JobId::from("job"), RunId::generate(1)))
}

fn sample_snapshot(metadata: RunMetadata, state: State) -> Snapshot {
    let clock = FakeClock::new();
    let mut lifecycle = Lifecycle::new();
    lifecycle.set_state(state, clock.now_utc());
    Snapshot {
        metadata,
        lifecycle,
        tracker: TaskTracker::new("task").tracked_task(),
        last_status: None,
        output: OutputRing::new(10),
        error_output: OutputRing::new(1000),
        warnings: HashMap::new(),
        exec_error: None,
    }
}

#[test]
fn output_events_carry_the_most_recently_observed_phase() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    let listener = UnixDatagram::bind(dir.join("x.olistener")).unwrap();
    listener.set_read_timeout(Some(std::time::Duration::from_millis(200))).unwrap();

    let metadata = sample_metadata();
    let dispatcher = OutputDispatcher::new(dir, metadata.clone()).unwrap();
    dispatcher.on_state_change(&sample_snapshot(metadata, State::Running));
    dispatcher.on_output("Happy Mushrooms", true);

    let mut buf = [0u8; 4096];
    let n = listener.recv(&mut buf).unwrap();
    let envelope: Envelope<OutputEvent> = serde_json::from_slice(&buf[..n]).unwrap();
    assert_eq!(envelope.event.output, "Happy Mushrooms");
    assert!(envelope.event.is_error);
    assert_eq!(envelope.event.phase.unwrap().state, State::Running);
}

#[test]
fn output_before_any_phase_is_observed_carries_no_phase() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    let listener = UnixDatagram::bind(dir.join("x.olistener")).unwrap();
    listener.set_read_timeout(Some(std::time::Duration::from_millis(200))).unwrap();

    let dispatcher = OutputDispatcher::new(dir, sample_metadata()).unwrap();
    dispatcher.on_output("early", false);

    let mut buf = [0u8; 4096];
    let n = listener.recv(&mut buf).unwrap();
    let envelope: Envelope<OutputEvent> = serde_json::from_slice(&buf[..n]).unwrap();
    assert!(envelope.event.phase.is_none());
}

#[test]
fn output_longer_than_the_limit_is_truncated_before_dispatch() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    let listener = UnixDatagram::bind(dir.join("x.olistener")).unwrap();
    listener.set_read_timeout(Some(std::time::Duration::from_millis(200))).unwrap();

    let dispatcher = OutputDispatcher::new(dir, sample_metadata()).unwrap();
    dispatcher.on_output(&"y".repeat(crate::wire::MAX_OUTPUT_BYTES + 1000), false);

    let mut buf = [0u8; 16_384];
    let n = listener.recv(&mut buf).unwrap();
    let envelope: Envelope<OutputEvent> = serde_json::from_slice(&buf[..n]).unwrap();
    assert!(envelope.event.output.ends_with(".. (truncated)"));
}
