// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caps the number of concurrently-executing instances of a named group at `N`.

use std::sync::Arc;

use phaser_core::{Parameter, Signal, Snapshot, State};

use crate::coordinator::Coordinator;
use crate::locker::Locker;
use crate::registry::CoordinatorRegistry;

pub struct Parallel {
    group: String,
    limit: usize,
    registry: CoordinatorRegistry,
    locker: Arc<dyn Locker>,
}

impl Parallel {
    pub fn new(group: impl Into<String>, limit: usize, registry: CoordinatorRegistry, locker: Arc<dyn Locker>) -> Self {
        Self { group: group.into(), limit, registry, locker }
    }
}

impl Coordinator for Parallel {
    fn set_signal(&self, snapshot: &Snapshot) -> Signal {
        if self.registry.executing_in_group(&self.group) < self.limit {
            self.registry.enter_group(&self.group, &snapshot.metadata.id);
            Signal::Continue
        } else {
            Signal::Wait
        }
    }

    fn exec_state(&self) -> State {
        State::Waiting
    }

    fn release(&self) {
        self.locker.notify_all();
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::new("coordinator", "parallel"),
            Parameter::new("group", self.group.clone()),
            Parameter::new("limit", self.limit.to_string()),
        ]
    }

    fn on_terminal(&self, snapshot: &Snapshot) {
        self.registry.leave_group(&self.group, &snapshot.metadata.id);
        self.locker.notify_all();
    }
}

#[cfg(test)]
#[path = "parallel_tests.rs"]
mod tests;
