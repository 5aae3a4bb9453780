// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator (sync) policy contract.

use std::time::Duration;

use phaser_core::{Parameter, Signal, Snapshot, State};

use crate::locker::Section;

/// Default poll interval used by coordinators that have no specific wake
/// source and must periodically re-check shared state (e.g. `Serial`,
/// `Parallel`, `NoOverlap` waiting on another instance's termination).
pub const DEFAULT_WAIT_POLL: Duration = Duration::from_millis(250);

/// A predicate that, given a run snapshot, decides whether the run may
/// proceed. `set_signal` must be pure with respect to the snapshot and the
/// shared state visible under the Locker: no blocking inside `set_signal`.
pub trait Coordinator: Send + Sync {
    fn set_signal(&self, snapshot: &Snapshot) -> Signal;

    /// The waiting/terminal state associated with the last signal; used by
    /// the Runner when the signal is not `Continue`.
    fn exec_state(&self) -> State;

    /// Idempotent wake of any coordinator-internal wait.
    fn release(&self);

    /// Atomically release the passed Locker section and block until woken
    /// or a coordinator-specific timer elapses. The default polls on
    /// [`DEFAULT_WAIT_POLL`]; coordinators with an exact wake condition
    /// (e.g. `Latch`) may still rely on the default since `release()` wakes
    /// the shared condvar immediately.
    fn unlock_and_wait(&self, section: &mut dyn Section) {
        section.unlock_and_wait(DEFAULT_WAIT_POLL);
    }

    /// Static description exposed for run metadata.
    fn parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }

    /// Called once by the Runner after the run reaches a terminal state, so
    /// group/job-scoped coordinators can deregister themselves from the
    /// shared registry. No-op for coordinators that track no such state.
    fn on_terminal(&self, _snapshot: &Snapshot) {}
}
