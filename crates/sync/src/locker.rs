// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide reentrant critical section guarding coordination state.

use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A scoped critical section acquired from a [`Locker`].
pub trait Section {
    /// Atomically release this section, block the caller until woken (via
    /// [`Locker::notify_all`]) or `timeout` elapses, then reacquire the
    /// section before returning.
    fn unlock_and_wait(&mut self, timeout: Duration);
}

/// Factory for a process-wide reentrant critical section guarding all
/// coordinators' check-then-act decisions.
pub trait Locker: Send + Sync {
    fn acquire(&self) -> Box<dyn Section + '_>;

    /// Wake any caller blocked in [`Section::unlock_and_wait`]. Coordinators
    /// call this from `release()` and whenever shared coordination state
    /// they gate on may have changed.
    fn notify_all(&self);
}

struct LockState {
    owner: Option<ThreadId>,
    depth: u32,
}

/// Real, single-process [`Locker`]: a `parking_lot` mutex made reentrant via
/// a thread-id/depth counter, paired with a condvar used both for lock
/// handoff and for [`Locker::notify_all`] wakeups.
pub struct MutexLocker {
    state: Arc<Mutex<LockState>>,
    condvar: Arc<Condvar>,
}

impl MutexLocker {
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(LockState { owner: None, depth: 0 })), condvar: Arc::new(Condvar::new()) }
    }
}

impl Default for MutexLocker {
    fn default() -> Self {
        Self::new()
    }
}

impl Locker for MutexLocker {
    fn acquire(&self) -> Box<dyn Section + '_> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    break;
                }
                Some(owner) if owner == me => {
                    state.depth += 1;
                    break;
                }
                _ => self.condvar.wait(&mut state),
            }
        }
        drop(state);
        Box::new(MutexSection { locker: self })
    }

    fn notify_all(&self) {
        self.condvar.notify_all();
    }
}

struct MutexSection<'a> {
    locker: &'a MutexLocker,
}

impl Section for MutexSection<'_> {
    fn unlock_and_wait(&mut self, timeout: Duration) {
        let me = thread::current().id();
        let mut state = self.locker.state.lock();
        let saved_depth = state.depth;
        state.owner = None;
        state.depth = 0;
        self.locker.condvar.notify_all();

        self.locker.condvar.wait_for(&mut state, timeout);

        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = saved_depth;
                    break;
                }
                Some(owner) if owner == me => {
                    // Reentered before we got a chance to reacquire; restore our depth on top.
                    state.depth += saved_depth;
                    break;
                }
                _ => self.locker.condvar.wait(&mut state),
            }
        }
    }
}

impl Drop for MutexSection<'_> {
    fn drop(&mut self) {
        let mut state = self.locker.state.lock();
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.owner = None;
            self.locker.condvar.notify_all();
        }
    }
}

/// No-op locker for deterministic unit tests, mirroring a null-object state lock.
/// `unlock_and_wait` sleeps briefly instead of blocking on a real condition,
/// since there is no shared state to wait on.
pub struct NullLocker;

struct NullSection;

impl Section for NullSection {
    fn unlock_and_wait(&mut self, timeout: Duration) {
        thread::sleep(timeout.min(Duration::from_millis(5)));
    }
}

impl Locker for NullLocker {
    fn acquire(&self) -> Box<dyn Section + '_> {
        Box::new(NullSection)
    }

    fn notify_all(&self) {}
}

#[cfg(test)]
#[path = "locker_tests.rs"]
mod tests;
