// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-global registry of EXECUTING runs, keyed by coordination group.
//!
//! `Serial`, `Parallel`, `NoOverlap`, and `Dependency` all need visibility
//! into which runs are currently `Executing` elsewhere in the process. This
//! registry is the shared state they check-then-act on; all mutation must
//! happen while the caller holds the coordination [`Locker`](crate::Locker)
//! section, which the coordinators do as part of `set_signal`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use phaser_core::{JobId, RunRef};

/// Explicit, `Arc`-wired registry — not a hidden global `static` — so tests
/// and multiple in-process runtimes can hold independent instances.
#[derive(Clone, Default)]
pub struct CoordinatorRegistry {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    groups: HashMap<String, Vec<RunRef>>,
    by_job: HashMap<JobId, Vec<RunRef>>,
    executing: Vec<RunRef>,
}

impl CoordinatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `run` as `Executing` in `group`. No-op if already present.
    pub fn enter_group(&self, group: &str, run: &RunRef) {
        let mut inner = self.inner.lock();
        let members = inner.groups.entry(group.to_string()).or_default();
        if !members.contains(run) {
            members.push(run.clone());
        }
    }

    /// Removes `run` from `group`'s executing set.
    pub fn leave_group(&self, group: &str, run: &RunRef) {
        let mut inner = self.inner.lock();
        if let Some(members) = inner.groups.get_mut(group) {
            members.retain(|r| r != run);
            if members.is_empty() {
                inner.groups.remove(group);
            }
        }
    }

    pub fn executing_in_group(&self, group: &str) -> usize {
        self.inner.lock().groups.get(group).map(Vec::len).unwrap_or(0)
    }

    /// Marks `run` as `Executing` for `NoOverlap` purposes, keyed by job id.
    pub fn enter_job(&self, run: &RunRef) {
        let mut inner = self.inner.lock();
        let members = inner.by_job.entry(run.job_id.clone()).or_default();
        if !members.contains(run) {
            members.push(run.clone());
        }
    }

    pub fn leave_job(&self, run: &RunRef) {
        let mut inner = self.inner.lock();
        if let Some(members) = inner.by_job.get_mut(&run.job_id) {
            members.retain(|r| r != run);
            if members.is_empty() {
                inner.by_job.remove(&run.job_id);
            }
        }
    }

    /// True if any instance of `job_id` other than `exclude` is currently executing.
    pub fn job_has_other_executing(&self, job_id: &JobId, exclude: &RunRef) -> bool {
        self.inner
            .lock()
            .by_job
            .get(job_id)
            .map(|members| members.iter().any(|r| r != exclude))
            .unwrap_or(false)
    }

    /// True if `target` is currently registered as executing in any group or job set.
    pub fn is_executing(&self, target: &RunRef) -> bool {
        let inner = self.inner.lock();
        inner.groups.values().any(|members| members.contains(target))
            || inner.by_job.values().any(|members| members.contains(target))
            || inner.executing.contains(target)
    }

    /// Marks `run` as executing, independent of any group or job membership.
    /// The Runner calls this for every run regardless of its coordinator, so
    /// `Dependency(target_id)` can observe any run's executing status.
    pub fn mark_executing(&self, run: &RunRef) {
        let mut inner = self.inner.lock();
        if !inner.executing.contains(run) {
            inner.executing.push(run.clone());
        }
    }

    pub fn unmark_executing(&self, run: &RunRef) {
        let mut inner = self.inner.lock();
        inner.executing.retain(|r| r != run);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
