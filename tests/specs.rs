// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-crate scenarios exercising the phaser end to end: a Runner wired to
//! a real Locker/CoordinatorRegistry, driving an Execution, publishing
//! through the net-crate dispatchers to a real Unix-domain socket receiver.

use std::os::unix::net::UnixDatagram;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use phaser_core::{ExecutionError, FakeClock, JobId, OutputObserver, RunId, RunRef, State};
use phaser_net::{EventReceiver, OutputDispatcher, OutputEvent, PhaseDispatcher, PhaseTransitionEvent};
use phaser_runtime::{ClosureExecution, Runner};
use phaser_sync::{CoordinatorRegistry, Latch, Locker, MutexLocker, NoSync, Parallel};

fn run_ref(name: &str) -> RunRef {
    RunRef::new(JobId::from(name), RunId::generate(1))
}

/// S1: a run with no coordination gate goes straight to completion and
/// carries no execution error.
#[test]
fn s1_an_unsynchronized_run_completes_without_waiting() {
    let runner = Runner::new(
        run_ref("nightly-build"),
        Arc::new(ClosureExecution::new(|| Ok(State::Completed))),
        Arc::new(NoSync),
        Arc::new(MutexLocker::new()),
        CoordinatorRegistry::new(),
        FakeClock::new(),
    );
    runner.run().unwrap();
    let snapshot = runner.create_snapshot();
    assert_eq!(snapshot.lifecycle.state(), State::Completed);
    assert!(snapshot.exec_error.is_none());
}

/// S2/S3: a run gated on a Latch waits, and a stop before release cancels
/// it without ever invoking the Execution body.
#[test]
fn s2_s3_stopping_a_waiting_run_cancels_it_unexecuted() {
    let locker: Arc<dyn Locker> = Arc::new(MutexLocker::new());
    let latch = Arc::new(Latch::new(State::Waiting, locker.clone()));
    let executed = Arc::new(AtomicUsize::new(0));
    let executed_clone = executed.clone();

    let runner = Arc::new(Runner::new(
        run_ref("nightly-build"),
        Arc::new(ClosureExecution::new(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
            Ok(State::Completed)
        })),
        latch,
        locker,
        CoordinatorRegistry::new(),
        FakeClock::new(),
    ));

    let handle = {
        let runner = runner.clone();
        std::thread::spawn(move || runner.run().unwrap())
    };
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(runner.create_snapshot().lifecycle.state(), State::Waiting);

    runner.stop();
    handle.join().unwrap();

    assert_eq!(runner.create_snapshot().lifecycle.state(), State::Cancelled);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

/// S4: a typed Execution error lands the run on its declared nonsuccess state.
#[test]
fn s4_a_typed_execution_error_is_reported_on_its_own_state() {
    let runner = Runner::new(
        run_ref("nightly-build"),
        Arc::new(ClosureExecution::new(|| Err(ExecutionError::new("disk full", State::Failed)))),
        Arc::new(NoSync),
        Arc::new(MutexLocker::new()),
        CoordinatorRegistry::new(),
        FakeClock::new(),
    );
    runner.run().unwrap();
    let snapshot = runner.create_snapshot();
    assert_eq!(snapshot.lifecycle.state(), State::Failed);
    assert_eq!(snapshot.exec_error.unwrap().message, "disk full");
}

/// Invariant 6: `Parallel(group, limit)` never admits more than `limit`
/// concurrently-executing runs into the same group, observed under real
/// threads racing on a shared registry and locker.
#[test]
fn invariant_6_parallel_never_exceeds_its_concurrency_limit() {
    let registry = CoordinatorRegistry::new();
    let locker = Arc::new(MutexLocker::new());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_observed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let registry = registry.clone();
            let locker: Arc<dyn Locker> = locker.clone();
            let in_flight = in_flight.clone();
            let max_observed = max_observed.clone();
            std::thread::spawn(move || {
                let coordinator = Arc::new(Parallel::new("nightly-batch", 2, registry.clone(), locker.clone()));
                let in_flight = in_flight.clone();
                let max_observed = max_observed.clone();
                let runner = Runner::new(
                    run_ref(&format!("batch-{i}")),
                    Arc::new(ClosureExecution::new(move || {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_observed.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(15));
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(State::Completed)
                    })),
                    coordinator,
                    locker,
                    registry,
                    FakeClock::new(),
                );
                runner.run().unwrap();
                runner.create_snapshot().lifecycle.state()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), State::Completed);
    }
    assert!(max_observed.load(Ordering::SeqCst) <= 2);
}

/// S6, at the cross-crate level: a Runner's phase transitions and output are
/// dispatched over real Unix-domain sockets and decoded by the matching
/// receivers, in the same shape the dispatchers would see from a live Runner.
#[test]
fn s6_runner_transitions_and_output_reach_real_socket_listeners() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();

    let phase_listener = UnixDatagram::bind(dir.join("test.plistener")).unwrap();
    phase_listener.set_read_timeout(Some(Duration::from_millis(500))).unwrap();

    let run_ref = run_ref("nightly-build");
    let runner = Arc::new(Runner::new(
        run_ref.clone(),
        Arc::new(ClosureExecution::new(|| {
            std::thread::sleep(Duration::from_millis(5));
            Ok(State::Completed)
        })),
        Arc::new(NoSync),
        Arc::new(MutexLocker::new()),
        CoordinatorRegistry::new(),
        FakeClock::new(),
    ));

    let phase_dispatcher: Arc<phaser_net::PhaseDispatcher> = Arc::new(PhaseDispatcher::new(dir.clone()).unwrap());
    runner.add_state_observer(phase_dispatcher.clone() as Arc<dyn phaser_runtime::StateObserver>, 0, true);

    let output_dispatcher = Arc::new(OutputDispatcher::new(dir.clone(), runner.metadata().clone()).unwrap());
    runner.add_state_observer(output_dispatcher.clone() as Arc<dyn phaser_runtime::StateObserver>, 0, false);
    runner.add_output_observer(output_dispatcher.clone() as Arc<dyn phaser_core::OutputObserver>, 0);

    let output_receiver = Arc::new(EventReceiver::<OutputEvent>::bind_output(&dir).unwrap());
    let seen_output = Arc::new(Mutex::new(None));
    let seen_output_clone = seen_output.clone();
    let receiver_thread = {
        let output_receiver = output_receiver.clone();
        std::thread::spawn(move || loop {
            let delivered = output_receiver
                .recv_one(&mut |_, event: OutputEvent| *seen_output_clone.lock().unwrap() = Some(event))
                .unwrap();
            if delivered {
                break;
            }
        })
    };

    runner.run().unwrap();
    // The ClosureExecution body itself never calls `on_output`; push a line
    // through the Runner's own output relay path via a warning observer would
    // not exercise OutputDispatcher, so instead assert directly on its
    // dispatch of a synthetic output line alongside the real phase traffic.
    output_dispatcher.on_output("batch complete", false);

    receiver_thread.join().unwrap();

    let mut buf = [0u8; 4096];
    let n = phase_listener.recv(&mut buf).unwrap();
    let envelope: phaser_net::Envelope<PhaseTransitionEvent> = serde_json::from_slice(&buf[..n]).unwrap();
    assert_eq!(envelope.instance_metadata.id, run_ref);
    // The first datagram is the register-with-notify delivery of the phase
    // already recorded at construction (`Created`), not the later `Running`
    // transition, since `PhaseDispatcher` dispatches on every `on_state_change`
    // call including that initial one.
    assert!(envelope.event.previous_phase.is_none());
    assert_eq!(envelope.event.new_phase.state, State::Created);

    let output_event = seen_output.lock().unwrap().take().unwrap();
    assert_eq!(output_event.output, "batch complete");
    assert!(output_event.phase.is_some());
}
