// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external task-body contract the Runner drives.

use crate::metadata::Parameter;
use crate::state::State;

/// Observer of output lines produced while an Execution runs.
///
/// Each line is delivered exactly once to each registered observer as
/// `(line, is_error)`. Implementations must not block long, and must not
/// call back into the Runner that owns them.
pub trait OutputObserver: Send + Sync {
    fn on_output(&self, line: &str, is_error: bool);
}

/// A typed failure from an Execution body. `exec_state` must carry a
/// `Nonsuccess`-flagged terminal state (`Failed`, `StartFailed`, ...).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
    pub exec_state: State,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>, exec_state: State) -> Self {
        let message = message.into();
        debug_assert!(
            exec_state.is_nonsuccess(),
            "ExecutionError exec_state must be a nonsuccess state, got {exec_state}"
        );
        Self { message, exec_state }
    }
}

/// External task body invoked by the phaser once coordination yields `Continue`.
///
/// `execute` performs the work and returns a terminal state (typically
/// `Completed` or `Failed`), or fails with a typed [`ExecutionError`] carrying
/// the state to transition to, or any other error (treated as unexpected and
/// mapped to `Error`).
///
/// Every method takes `&self`, not `&mut self`: a Runner calls `execute()`
/// from its own run thread while `stop()` must remain callable from another
/// thread for the whole duration of that call, so implementations push any
/// mutable state behind their own interior mutability (an `AtomicBool` for a
/// cancel flag, a `Mutex` around a one-shot closure) rather than relying on
/// exclusive access. This lets a Runner hold an `Arc<dyn Execution>` instead
/// of serializing every call through one lock shared with `stop()`.
pub trait Execution: Send + Sync {
    fn execute(&self) -> Result<State, ExecutionError>;

    /// Best-effort cooperative cancel. Safe to call before, during, or after `execute()`.
    fn stop(&self);

    /// True once `stop()` (or an equivalent interrupt) has been requested.
    fn interrupted(&self) -> bool;

    fn add_output_observer(&self, observer: std::sync::Arc<dyn OutputObserver>);
    fn remove_output_observer(&self, observer: &std::sync::Arc<dyn OutputObserver>);

    /// Static parameters exposed for run metadata.
    fn parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }
}
