// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapts a [`StateObserver`] registration to the phase-transition dispatcher.

use std::path::PathBuf;

use phaser_core::Snapshot;
use phaser_runtime::StateObserver;

use crate::dispatcher::{DispatchError, EventDispatcher};
use crate::socket_dir::PHASE_EXTENSION;
use crate::wire::{Phase, PhaseTransitionEvent, PHASE_EVENT_TYPE};

pub struct PhaseDispatcher {
    inner: EventDispatcher,
}

impl PhaseDispatcher {
    pub fn new(dir: PathBuf) -> Result<Self, DispatchError> {
        Ok(Self { inner: EventDispatcher::new(dir, PHASE_EXTENSION)? })
    }
}

impl StateObserver for PhaseDispatcher {
    fn on_state_change(&self, snapshot: &Snapshot) {
        let transitions = snapshot.lifecycle.state_changes();
        let Some(&(new_state, new_ts)) = transitions.last() else {
            return;
        };
        let previous_phase =
            if transitions.len() >= 2 { transitions.get(transitions.len() - 2) } else { None }
                .map(|&(state, timestamp)| Phase { state, timestamp });

        let event = PhaseTransitionEvent {
            job_run: snapshot.metadata.id.clone(),
            previous_phase,
            new_phase: Phase { state: new_state, timestamp: new_ts },
            ordinal: transitions.len() as u64 - 1,
        };

        if let Err(e) = self.inner.dispatch(&snapshot.metadata, PHASE_EVENT_TYPE, &event) {
            tracing::warn!(run = %snapshot.metadata.id, error = %e, "phase dispatch failed");
        }
    }
}

#[cfg(test)]
#[path = "phase_dispatcher_tests.rs"]
mod tests;
