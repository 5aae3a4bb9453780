// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapts an [`OutputObserver`] registration to the output dispatcher. Bound
//! to one run's metadata at construction, since `OutputObserver::on_output`
//! carries only a line and an error flag.

use std::path::PathBuf;

use parking_lot::Mutex;
use phaser_core::{OutputObserver, RunMetadata, Snapshot};
use phaser_runtime::StateObserver;

use crate::dispatcher::{DispatchError, EventDispatcher};
use crate::socket_dir::OUTPUT_EXTENSION;
use crate::wire::{truncate_output, OutputEvent, Phase, OUTPUT_EVENT_TYPE};

pub struct OutputDispatcher {
    inner: EventDispatcher,
    metadata: RunMetadata,
    last_phase: Mutex<Option<Phase>>,
}

impl OutputDispatcher {
    pub fn new(dir: PathBuf, metadata: RunMetadata) -> Result<Self, DispatchError> {
        Ok(Self { inner: EventDispatcher::new(dir, OUTPUT_EXTENSION)?, metadata, last_phase: Mutex::new(None) })
    }
}

/// Tracks the run's current phase so output events carry the phase in
/// effect when the line was produced. Register the same `Arc` against both
/// the state and output channels.
impl StateObserver for OutputDispatcher {
    fn on_state_change(&self, snapshot: &Snapshot) {
        if let Some(&(state, timestamp)) = snapshot.lifecycle.state_changes().last() {
            *self.last_phase.lock() = Some(Phase { state, timestamp });
        }
    }
}

impl OutputObserver for OutputDispatcher {
    fn on_output(&self, line: &str, is_error: bool) {
        let event = OutputEvent { phase: self.last_phase.lock().clone(), output: truncate_output(line), is_error };
        if let Err(e) = self.inner.dispatch(&self.metadata, OUTPUT_EVENT_TYPE, &event) {
            tracing::warn!(run = %self.metadata.id, error = %e, "output dispatch failed");
        }
    }
}

#[cfg(test)]
#[path = "output_dispatcher_tests.rs"]
mod tests;
