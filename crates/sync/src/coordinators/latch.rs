// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holds a run at `target_state` until [`Coordinator::release`] is called.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use phaser_core::{Parameter, Signal, Snapshot, State};

use crate::coordinator::Coordinator;
use crate::locker::Locker;

pub struct Latch {
    target_state: State,
    released: AtomicBool,
    locker: Arc<dyn Locker>,
}

impl Latch {
    pub fn new(target_state: State, locker: Arc<dyn Locker>) -> Self {
        debug_assert!(
            target_state.is_waiting(),
            "Latch target_state must be Waiting-flagged, got {target_state}"
        );
        Self { target_state, released: AtomicBool::new(false), locker }
    }
}

impl Coordinator for Latch {
    fn set_signal(&self, _snapshot: &Snapshot) -> Signal {
        if self.released.load(Ordering::SeqCst) {
            Signal::Continue
        } else {
            Signal::Wait
        }
    }

    fn exec_state(&self) -> State {
        self.target_state
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.locker.notify_all();
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::new("coordinator", "latch"), Parameter::new("target_state", self.target_state.to_string())]
    }
}

#[cfg(test)]
#[path = "latch_tests.rs"]
mod tests;
