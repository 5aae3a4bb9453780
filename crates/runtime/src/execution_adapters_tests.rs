// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::{Arc, Mutex};

use super::*;

struct CollectingObserver(Arc<Mutex<Vec<(String, bool)>>>);
impl OutputObserver for CollectingObserver {
    fn on_output(&self, line: &str, is_error: bool) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).push((line.to_string(), is_error));
    }
}

#[test]
fn closure_execution_returns_the_closures_state() {
    let exec = ClosureExecution::new(|| Ok(State::Completed));
    assert_eq!(exec.execute().unwrap(), State::Completed);
}

#[test]
fn closure_execution_propagates_typed_errors() {
    let exec = ClosureExecution::new(|| Err(ExecutionError::new("bad", State::Failed)));
    let err = exec.execute().unwrap_err();
    assert_eq!(err.message, "bad");
}

#[test]
fn closure_execution_tracks_interrupted_flag() {
    let exec = ClosureExecution::new(|| Ok(State::Completed));
    assert!(!exec.interrupted());
    exec.stop();
    assert!(exec.interrupted());
}

#[test]
fn shell_execution_streams_stdout_and_completes() {
    let exec = ShellExecution::new("sh", vec!["-c".into(), "echo hello".into()]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    exec.add_output_observer(Arc::new(CollectingObserver(seen.clone())));

    let result = exec.execute().unwrap();
    assert_eq!(result, State::Completed);
    assert_eq!(seen.lock().unwrap_or_else(|e| e.into_inner()).as_slice(), &[("hello".to_string(), false)]);
}

#[test]
fn shell_execution_nonzero_exit_maps_to_failed() {
    let exec = ShellExecution::new("sh", vec!["-c".into(), "exit 3".into()]);
    assert_eq!(exec.execute().unwrap(), State::Failed);
}

#[test]
fn shell_execution_missing_program_is_a_start_failure() {
    let exec = ShellExecution::new("definitely-not-a-real-binary-xyz", vec![]);
    let err = exec.execute().unwrap_err();
    assert_eq!(err.exec_state, State::StartFailed);
}
