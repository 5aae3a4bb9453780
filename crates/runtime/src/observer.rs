// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Priority-ordered observer registry shared by the state, output, and
//! warning channels.
//!
//! Observers are stored behind `Arc` so the Runner never owns the only
//! handle; removal is a linear scan by pointer identity, duplicate
//! registration is a no-op. A failing observer is isolated with
//! `catch_unwind` and reported to an [`ErrorHook`] instead of aborting
//! delivery to the remaining observers.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

/// Receives the panic payload of an observer that failed during notification.
pub trait ErrorHook<O: ?Sized>: Send + Sync {
    fn on_error(&self, observer: &Arc<O>, payload: Box<dyn Any + Send>);
}

/// Logs the observer failure via `tracing` and otherwise ignores it — the
/// default used when a Runner is built without a custom hook.
pub struct TracingErrorHook;

impl<O: ?Sized> ErrorHook<O> for TracingErrorHook {
    fn on_error(&self, _observer: &Arc<O>, payload: Box<dyn Any + Send>) {
        let message = panic_message(&payload);
        tracing::error!(error = %message, "observer notification panicked");
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

struct Entry<O: ?Sized> {
    priority: i32,
    observer: Arc<O>,
}

/// Priority-ordered registry of observers of type `O`. Lower `priority`
/// values are notified first, matching a min-heap-by-priority queue
/// ordering; ties preserve registration order.
pub struct PriorityRegistry<O: ?Sized> {
    entries: Mutex<Vec<Entry<O>>>,
}

impl<O: ?Sized> Default for PriorityRegistry<O> {
    fn default() -> Self {
        Self { entries: Mutex::new(Vec::new()) }
    }
}

impl<O: ?Sized> PriorityRegistry<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` at `priority`. A duplicate (by pointer identity)
    /// is a no-op.
    pub fn add(&self, observer: Arc<O>, priority: i32) {
        let mut entries = self.entries.lock();
        if entries.iter().any(|e| Arc::ptr_eq(&e.observer, &observer)) {
            return;
        }
        let pos = entries.iter().position(|e| e.priority > priority).unwrap_or(entries.len());
        entries.insert(pos, Entry { priority, observer });
    }

    pub fn remove(&self, observer: &Arc<O>) {
        self.entries.lock().retain(|e| !Arc::ptr_eq(&e.observer, observer));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Snapshot of currently registered observers, in notification order.
    pub fn snapshot(&self) -> Vec<Arc<O>> {
        self.entries.lock().iter().map(|e| e.observer.clone()).collect()
    }

    /// Invokes `notify` for every registered observer in priority order,
    /// isolating panics via `hook`.
    pub fn notify_each(&self, hook: &dyn ErrorHook<O>, mut notify: impl FnMut(&O)) {
        for observer in self.snapshot() {
            let result = catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref())));
            if let Err(payload) = result {
                hook.on_error(&observer, payload);
            }
        }
    }
}
