// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three observer channels a Runner publishes to: state/phase
//! transitions, output, and warnings. Each channel merges a per-instance
//! registry with a process-wide global registry that receives events from
//! every Runner.

use std::sync::{Arc, OnceLock};

use phaser_core::{OutputObserver, Snapshot};

use crate::observer::{ErrorHook, PriorityRegistry, TracingErrorHook};

/// Observes a run's lifecycle transitions. Receives the full snapshot after
/// each recorded transition, including the register-with-notify delivery of
/// the current state.
pub trait StateObserver: Send + Sync {
    fn on_state_change(&self, snapshot: &Snapshot);
}

/// Observes warning accumulation. Receives the snapshot reflecting the
/// warning that was just recorded.
pub trait WarningObserver: Send + Sync {
    fn on_warning(&self, snapshot: &Snapshot);
}

/// One Runner's local observer registries plus a handle to the global ones.
pub struct ObserverChannels {
    pub state: PriorityRegistry<dyn StateObserver>,
    pub output: PriorityRegistry<dyn OutputObserver>,
    pub warning: PriorityRegistry<dyn WarningObserver>,
}

impl Default for ObserverChannels {
    fn default() -> Self {
        Self { state: PriorityRegistry::new(), output: PriorityRegistry::new(), warning: PriorityRegistry::new() }
    }
}

impl ObserverChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifies local observers first, then the process-wide global ones,
    /// each channel preserving its own priority order.
    pub fn notify_state(&self, snapshot: &Snapshot, hook: &dyn ErrorHook<dyn StateObserver>) {
        self.state.notify_each(hook, |o| o.on_state_change(snapshot));
        global_channels().state.notify_each(hook, |o| o.on_state_change(snapshot));
    }

    pub fn notify_output(&self, line: &str, is_error: bool, hook: &dyn ErrorHook<dyn OutputObserver>) {
        self.output.notify_each(hook, |o| o.on_output(line, is_error));
        global_channels().output.notify_each(hook, |o| o.on_output(line, is_error));
    }

    pub fn notify_warning(&self, snapshot: &Snapshot, hook: &dyn ErrorHook<dyn WarningObserver>) {
        self.warning.notify_each(hook, |o| o.on_warning(snapshot));
        global_channels().warning.notify_each(hook, |o| o.on_warning(snapshot));
    }
}

static GLOBAL: OnceLock<ObserverChannels> = OnceLock::new();

/// The process-wide registry that receives events from every Runner, in
/// addition to each Runner's own local registrations.
pub fn global_channels() -> &'static ObserverChannels {
    GLOBAL.get_or_init(ObserverChannels::new)
}

/// Default error hook shared by all three channels unless a Runner is built
/// with a custom one.
pub fn default_error_hook() -> Arc<TracingErrorHook> {
    Arc::new(TracingErrorHook)
}
