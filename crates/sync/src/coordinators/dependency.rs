// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waits until a named target run is currently executing.

use std::sync::Arc;

use phaser_core::{Parameter, RunRef, Signal, Snapshot, State};

use crate::coordinator::Coordinator;
use crate::locker::Locker;
use crate::registry::CoordinatorRegistry;

pub struct Dependency {
    target: RunRef,
    registry: CoordinatorRegistry,
    locker: Arc<dyn Locker>,
}

impl Dependency {
    pub fn new(target: RunRef, registry: CoordinatorRegistry, locker: Arc<dyn Locker>) -> Self {
        Self { target, registry, locker }
    }
}

impl Coordinator for Dependency {
    fn set_signal(&self, _snapshot: &Snapshot) -> Signal {
        if self.registry.is_executing(&self.target) {
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
        vec![Parameter::new("coordinator", "dependency"), Parameter::new("target", self.target.to_string())]
    }
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
