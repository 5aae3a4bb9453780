// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds surfaced by the run engine.

use crate::state::State;

/// Errors the Runner can raise directly (as opposed to recording in `exec_error`
/// and continuing to a terminal lifecycle state).
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// `run()` was called a second time on the same Runner.
    #[error("run() was already called on this runner")]
    AlreadyRun,

    /// A coordinator returned `Signal::None`, or a `Wait`/`Reject` exec_state
    /// did not carry the required flag.
    #[error("programming error: {0}")]
    Programming(String),

    /// `coord.set_signal` raised. No execution occurs; terminal state is `Error`.
    #[error("coordination failed: {0}")]
    Coordination(String),

    /// An unexpected (non-`ExecutionError`) error escaped the Execution body.
    #[error("unexpected execution error: {0}")]
    UnexpectedExecution(String),
}

impl RunError {
    /// The terminal state this error implies for the run's lifecycle, if any.
    /// `AlreadyRun` has no lifecycle effect since no new run was started.
    pub fn terminal_state(&self) -> Option<State> {
        match self {
            RunError::AlreadyRun => None,
            RunError::Programming(_) | RunError::Coordination(_) | RunError::UnexpectedExecution(_) => {
                Some(State::Error)
            }
        }
    }
}
