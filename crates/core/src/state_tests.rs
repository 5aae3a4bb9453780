// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn progression_order_matches_spec() {
    assert!(State::None < State::Created);
    assert!(State::Created < State::Waiting);
    assert!(State::Waiting < State::Running);
    assert!(State::Running < State::Triggered);
    assert!(State::Triggered < State::Started);
    assert!(State::Started < State::Completed);
    assert!(State::Completed < State::Cancelled);
    assert!(State::Cancelled < State::Stopped);
    assert!(State::Stopped < State::StartFailed);
    assert!(State::StartFailed < State::Interrupted);
    assert!(State::Interrupted < State::Failed);
    assert!(State::Failed < State::Error);
}

#[test]
fn before_execution_states() {
    assert!(State::Created.is_before_execution());
    assert!(State::Waiting.is_before_execution());
    assert!(!State::Running.is_before_execution());
}

#[test]
fn executing_states() {
    assert!(State::Running.is_executing());
    assert!(State::Triggered.is_executing());
    assert!(State::Started.is_executing());
    assert!(!State::Waiting.is_executing());
    assert!(!State::Completed.is_executing());
}

#[yare::parameterized(
    completed    = { State::Completed },
    cancelled    = { State::Cancelled },
    stopped      = { State::Stopped },
    start_failed = { State::StartFailed },
    interrupted  = { State::Interrupted },
    failed       = { State::Failed },
    error        = { State::Error },
)]
fn terminal_states(state: State) {
    assert!(state.is_terminal());
}

#[yare::parameterized(
    none    = { State::None },
    created = { State::Created },
    waiting = { State::Waiting },
    running = { State::Running },
)]
fn non_terminal_states(state: State) {
    assert!(!state.is_terminal());
}

#[test]
fn exactly_one_of_success_or_nonsuccess_for_terminal_states() {
    for s in [
        State::Completed,
        State::Cancelled,
        State::Stopped,
        State::StartFailed,
        State::Interrupted,
        State::Failed,
        State::Error,
    ] {
        assert_ne!(s.is_success(), s.is_nonsuccess(), "{s} flags should be exclusive");
    }
}

#[test]
fn cancelled_is_unexecuted_and_aborted() {
    assert!(State::Cancelled.has_flag(Flag::Unexecuted));
    assert!(State::Cancelled.has_flag(Flag::Aborted));
}

#[test]
fn stopped_is_aborted_but_not_unexecuted() {
    assert!(State::Stopped.has_flag(Flag::Aborted));
    assert!(!State::Stopped.has_flag(Flag::Unexecuted));
}

#[test]
fn display_matches_lowercase_snake_case() {
    assert_eq!(State::StartFailed.to_string(), "start_failed");
    assert_eq!(State::Completed.to_string(), "completed");
}

#[test]
fn state_is_json_round_trippable() {
    for s in [State::None, State::Waiting, State::Completed, State::Error] {
        let json = serde_json::to_string(&s).expect("serialize");
        let back: State = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(s, back);
    }
}
