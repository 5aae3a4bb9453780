// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chains coordinators: the first child whose signal isn't `Continue` decides
//! the outcome; `exec_state` reflects that child's.

use parking_lot::Mutex;
use phaser_core::{Parameter, Signal, Snapshot, State};

use crate::coordinator::Coordinator;
use crate::locker::Section;

pub struct Composite {
    children: Vec<Box<dyn Coordinator>>,
    last_exec_state: Mutex<State>,
}

impl Composite {
    pub fn new(children: Vec<Box<dyn Coordinator>>) -> Self {
        Self { children, last_exec_state: Mutex::new(State::None) }
    }
}

impl Coordinator for Composite {
    fn set_signal(&self, snapshot: &Snapshot) -> Signal {
        for child in &self.children {
            let signal = child.set_signal(snapshot);
            if signal != Signal::Continue {
                *self.last_exec_state.lock() = child.exec_state();
                return signal;
            }
        }
        Signal::Continue
    }

    fn exec_state(&self) -> State {
        *self.last_exec_state.lock()
    }

    fn release(&self) {
        for child in &self.children {
            child.release();
        }
    }

    fn unlock_and_wait(&self, section: &mut dyn Section) {
        // Defer to the child currently deciding the wait, so a coordinator
        // with an exact wake condition (e.g. Latch) is not forced onto a
        // generic poll interval.
        for child in &self.children {
            if child.exec_state() == self.exec_state() {
                child.unlock_and_wait(section);
                return;
            }
        }
        section.unlock_and_wait(crate::coordinator::DEFAULT_WAIT_POLL);
    }

    fn parameters(&self) -> Vec<Parameter> {
        self.children.iter().flat_map(|c| c.parameters()).collect()
    }

    fn on_terminal(&self, snapshot: &Snapshot) {
        for child in &self.children {
            child.on_terminal(snapshot);
        }
    }
}

#[cfg(test)]
#[path = "composite_tests.rs"]
mod tests;
