// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The phaser: drives one run through coordination, execution, and a
//! terminal lifecycle state, publishing snapshots to observers along the
//! way.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use phaser_core::{
    Clock, Execution, ExecutionError, Lifecycle, OutputObserver, OutputRing, Parameter, RunError, RunMetadata, RunRef,
    Signal, Snapshot, State, TaskTracker, ERROR_OUTPUT_RING_CAPACITY, OUTPUT_RING_CAPACITY,
};
use phaser_sync::{Coordinator, CoordinatorRegistry, Locker};

use crate::channels::{default_error_hook, ObserverChannels, StateObserver, WarningObserver};
use crate::observer::ErrorHook;

/// Outcome of classifying a coordinator's [`Signal`] for one loop iteration —
/// `Signal::None` is rejected by `classify` before this point, so the loop
/// only ever has to handle three cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Wait,
    Reject,
    Continue,
}

struct RunnerState {
    lifecycle: Lifecycle,
    exec_error: Option<ExecutionError>,
    warnings: HashMap<String, u32>,
    output: OutputRing,
    error_output: OutputRing,
    last_status: Option<String>,
}

/// Drives one run. `run()` may be called at most once; further operations
/// (`stop`, `interrupted`, observer registration) remain valid for the
/// Runner's lifetime.
pub struct Runner<Clk: Clock> {
    metadata: RunMetadata,
    execution: Arc<dyn Execution>,
    coordinator: Arc<dyn Coordinator>,
    locker: Arc<dyn Locker>,
    registry: CoordinatorRegistry,
    tracker: TaskTracker,
    clock: Clk,
    state: Arc<Mutex<RunnerState>>,
    channels: Arc<ObserverChannels>,
    aborted: AtomicBool,
    released: AtomicBool,
    has_run: AtomicBool,
}

impl<Clk: Clock> Runner<Clk> {
    pub fn new(
        run_ref: RunRef,
        execution: Arc<dyn Execution>,
        coordinator: Arc<dyn Coordinator>,
        locker: Arc<dyn Locker>,
        registry: CoordinatorRegistry,
        clock: Clk,
    ) -> Self {
        let mut parameters = execution.parameters();
        parameters.extend(coordinator.parameters());
        let metadata = RunMetadata::new(run_ref).parameters(parameters);
        let tracker = TaskTracker::new(metadata.id.job_id.to_string());

        let mut lifecycle = Lifecycle::new();
        lifecycle.set_state(State::Created, clock.now_utc());

        Self {
            metadata,
            execution,
            coordinator,
            locker,
            registry,
            tracker,
            state: Arc::new(Mutex::new(RunnerState {
                lifecycle,
                exec_error: None,
                warnings: HashMap::new(),
                output: OutputRing::new(OUTPUT_RING_CAPACITY),
                error_output: OutputRing::new(ERROR_OUTPUT_RING_CAPACITY),
                last_status: None,
            })),
            channels: Arc::new(ObserverChannels::new()),
            aborted: AtomicBool::new(false),
            released: AtomicBool::new(false),
            has_run: AtomicBool::new(false),
            clock,
        }
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Taken under the state lock so `exec_error` and the terminal lifecycle
    /// state are always reported consistently with each other.
    pub fn create_snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        self.snapshot_locked(&state)
    }

    fn snapshot_locked(&self, state: &RunnerState) -> Snapshot {
        Snapshot {
            metadata: self.metadata.clone(),
            lifecycle: state.lifecycle.clone(),
            tracker: self.tracker.tracked_task(),
            last_status: state.last_status.clone(),
            output: state.output.clone(),
            error_output: state.error_output.clone(),
            warnings: state.warnings.clone(),
            exec_error: state.exec_error.as_ref().map(Into::into),
        }
    }

    pub fn add_state_observer(&self, observer: Arc<dyn StateObserver>, priority: i32, notify_on_register: bool) {
        // Registration-with-notify happens under the state lock so the new
        // observer neither misses the current snapshot nor double-receives
        // a transition racing with registration.
        let state = self.state.lock();
        self.channels.state.add(observer.clone(), priority);
        if notify_on_register {
            let snapshot = self.snapshot_locked(&state);
            observer.on_state_change(&snapshot);
        }
    }

    pub fn remove_state_observer(&self, observer: &Arc<dyn StateObserver>) {
        self.channels.state.remove(observer);
    }

    pub fn add_output_observer(&self, observer: Arc<dyn OutputObserver>, priority: i32) {
        self.channels.output.add(observer, priority);
    }

    pub fn remove_output_observer(&self, observer: &Arc<dyn OutputObserver>) {
        self.channels.output.remove(observer);
    }

    pub fn add_warning_observer(&self, observer: Arc<dyn WarningObserver>, priority: i32) {
        self.channels.warning.add(observer, priority);
    }

    pub fn remove_warning_observer(&self, observer: &Arc<dyn WarningObserver>) {
        self.channels.warning.remove(observer);
    }

    pub fn add_warning(&self, warn: phaser_core::Warn) {
        let snapshot = {
            let mut state = self.state.lock();
            *state.warnings.entry(warn.category.clone()).or_insert(0) += 1;
            self.snapshot_locked(&state)
        };
        self.channels.notify_warning(&snapshot, default_error_hook().as_ref() as &dyn ErrorHook<dyn WarningObserver>);
    }

    /// Sets the latching abort flag, wakes the coordinator, and forwards to
    /// the Execution body if already running.
    pub fn stop(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.coordinator.release();
        self.locker.notify_all();
        self.execution.stop();
    }

    pub fn interrupted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Latches the released flag (a run Wait'ing on its own coordinator may
    /// still want an external nudge independent of `stop`) and wakes the
    /// coordinator.
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.coordinator.release();
        self.locker.notify_all();
    }

    /// Runs the coordination loop, then — on `Continue` — the Execution
    /// body. May be called at most once.
    pub fn run(&self) -> Result<(), RunError> {
        if self.has_run.swap(true, Ordering::SeqCst) {
            return Err(RunError::AlreadyRun);
        }

        match self.coordinate()? {
            false => Ok(()),
            true => self.execute(),
        }
    }

    /// Step 1-7 of the coordination loop: returns `Ok(true)` on `Continue`
    /// (lifecycle now `Running`), `Ok(false)` on `Reject` (lifecycle now
    /// `Cancelled`).
    fn coordinate(&self) -> Result<bool, RunError> {
        loop {
            let mut section = self.locker.acquire();

            let snapshot = self.create_snapshot();
            let (decision, target_state) = if self.aborted.load(Ordering::SeqCst) {
                (Decision::Reject, State::Cancelled)
            } else {
                let signal = self.coordinator.set_signal(&snapshot);
                self.classify(signal)?
            };

            // Held continuously from the transition through the observer
            // notification below, so a concurrent `add_state_observer`
            // registering with notify can't interleave and see the same
            // snapshot twice (or miss this one): `parking_lot::Mutex` is not
            // reentrant, so the two serialize on this lock.
            let mut state = self.state.lock();
            let already_there = state.lifecycle.state() == target_state;
            if decision == Decision::Wait && already_there {
                drop(state);
                self.coordinator.unlock_and_wait(section.as_mut());
                continue;
            }

            state.lifecycle.set_state(target_state, self.clock.now_utc());
            drop(section);

            let snapshot = self.snapshot_locked(&state);
            self.channels
                .notify_state(&snapshot, default_error_hook().as_ref() as &dyn ErrorHook<dyn StateObserver>);

            if target_state.is_executing() {
                self.registry.mark_executing(&self.metadata.id);
            }
            if target_state.is_terminal() {
                self.registry.unmark_executing(&self.metadata.id);
                self.coordinator.on_terminal(&snapshot);
            }
            drop(state);

            match decision {
                Decision::Wait => continue,
                Decision::Reject => return Ok(false),
                Decision::Continue => return Ok(true),
            }
        }
    }

    fn classify(&self, signal: Signal) -> Result<(Decision, State), RunError> {
        match signal {
            Signal::None => Err(RunError::Programming("coordinator returned Signal::None".into())),
            Signal::Reject => Ok((Decision::Reject, State::Cancelled)),
            Signal::Continue => Ok((Decision::Continue, State::Running)),
            Signal::Wait => {
                if self.released.load(Ordering::SeqCst) {
                    return Ok((Decision::Continue, State::Running));
                }
                let exec_state = self.coordinator.exec_state();
                if !exec_state.is_waiting() && !exec_state.is_terminal() {
                    return Err(RunError::Programming(format!(
                        "coordinator exec_state {exec_state} carries neither Waiting nor Terminal flag"
                    )));
                }
                Ok((Decision::Wait, exec_state))
            }
        }
    }

    fn execute(&self) -> Result<(), RunError> {
        let self_observer: Arc<dyn OutputObserver> = Arc::new(ExecutionOutputRelay {
            state: self.state.clone(),
            channels: self.channels.clone(),
        });
        self.execution.add_output_observer(self_observer.clone());
        let outcome = self.execution.execute();
        self.execution.remove_output_observer(&self_observer);

        let target_state = match outcome {
            Ok(state) => state,
            Err(err) => {
                let nonsuccess = err.exec_state;
                let mut state = self.state.lock();
                state.exec_error = Some(err);
                drop(state);
                nonsuccess
            }
        };

        self.finish(target_state)
    }

    fn finish(&self, target_state: State) -> Result<(), RunError> {
        // Same held-lock discipline as `coordinate`: the transition and its
        // notification must not be separated by a window where another
        // thread's registration can race them.
        let mut state = self.state.lock();
        state.lifecycle.set_state(target_state, self.clock.now_utc());
        let snapshot = self.snapshot_locked(&state);
        self.channels
            .notify_state(&snapshot, default_error_hook().as_ref() as &dyn ErrorHook<dyn StateObserver>);
        self.registry.unmark_executing(&self.metadata.id);
        self.coordinator.on_terminal(&snapshot);
        drop(state);
        Ok(())
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }
}

/// Bridges the Execution's output observer registration back into the
/// Runner's own output ring + output channel, so the Runner itself is the
/// single point every external output observer registers against.
///
/// Holds `Arc` handles to the Runner's state and channels rather than a
/// borrowed `&Runner`: `Execution::add_output_observer` requires a `'static`
/// trait object, which a reference tied to `&self`'s lifetime cannot satisfy.
struct ExecutionOutputRelay {
    state: Arc<Mutex<RunnerState>>,
    channels: Arc<ObserverChannels>,
}

impl OutputObserver for ExecutionOutputRelay {
    fn on_output(&self, line: &str, is_error: bool) {
        {
            let mut state = self.state.lock();
            if is_error {
                state.error_output.push(line);
            } else {
                state.output.push(line);
            }
        }
        self.channels.notify_output(
            line,
            is_error,
            default_error_hook().as_ref() as &dyn ErrorHook<dyn OutputObserver>,
        );
    }
}

/// Static parameters contributed by the Runner's own bookkeeping — currently
/// none, but kept for the same reason Execution/Coordinator expose one.
pub fn runner_parameters() -> Vec<Parameter> {
    Vec::new()
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
