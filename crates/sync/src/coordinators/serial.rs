// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allows at most one instance of a named group to execute at a time.

use std::sync::Arc;

use phaser_core::{Parameter, Signal, Snapshot, State};

use crate::coordinator::Coordinator;
use crate::locker::Locker;
use crate::registry::CoordinatorRegistry;

pub struct Serial {
    group: String,
    registry: CoordinatorRegistry,
    locker: Arc<dyn Locker>,
}

impl Serial {
    pub fn new(group: impl Into<String>, registry: CoordinatorRegistry, locker: Arc<dyn Locker>) -> Self {
        Self { group: group.into(), registry, locker }
    }
}

impl Coordinator for Serial {
    fn set_signal(&self, snapshot: &Snapshot) -> Signal {
        if self.registry.executing_in_group(&self.group) == 0 {
            self.registry.enter_group(&self.group, &snapshot.metadata.id);
            Signal::Continue
        } else {
            Signal::Wait
        }
    }

    fn exec_state(&self) -> State {
        // The canonical phase enumeration has only one Waiting-flagged state;
        // the "QUEUED" label from the coordination table is carried via the
        // run's pending_group metadata rather than a distinct phase value.
        State::Waiting
    }

    fn release(&self) {
        self.locker.notify_all();
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::new("coordinator", "serial"), Parameter::new("group", self.group.clone())]
    }

    fn on_terminal(&self, snapshot: &Snapshot) {
        self.registry.leave_group(&self.group, &snapshot.metadata.id);
        self.locker.notify_all();
    }
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod tests;
