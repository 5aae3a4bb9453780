// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rejects a second concurrent execution of the same job id.

use std::sync::Arc;

use phaser_core::{Parameter, Signal, Snapshot, State};

use crate::coordinator::Coordinator;
use crate::locker::Locker;
use crate::registry::CoordinatorRegistry;

pub struct NoOverlap {
    registry: CoordinatorRegistry,
    locker: Arc<dyn Locker>,
}

impl NoOverlap {
    pub fn new(registry: CoordinatorRegistry, locker: Arc<dyn Locker>) -> Self {
        Self { registry, locker }
    }
}

impl Coordinator for NoOverlap {
    fn set_signal(&self, snapshot: &Snapshot) -> Signal {
        let run_ref = &snapshot.metadata.id;
        if self.registry.job_has_other_executing(&run_ref.job_id, run_ref) {
            Signal::Wait
        } else {
            self.registry.enter_job(run_ref);
            Signal::Continue
        }
    }

    fn exec_state(&self) -> State {
        State::Waiting
    }

    fn release(&self) {
        self.locker.notify_all();
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::new("coordinator", "no_overlap")]
    }

    fn on_terminal(&self, snapshot: &Snapshot) {
        self.registry.leave_job(&snapshot.metadata.id);
        self.locker.notify_all();
    }
}

#[cfg(test)]
#[path = "no_overlap_tests.rs"]
mod tests;
