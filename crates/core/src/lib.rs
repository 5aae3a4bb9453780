// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core data model of the run engine: phases, lifecycle, run identity,
//! execution contract, and the task tracker.
//!
//! This crate has no knowledge of coordination, observer fan-out, or the
//! network boundary — those live in `phaser-sync`, `phaser-runtime`, and
//! `phaser-net` respectively. It defines the vocabulary the rest of the
//! run engine is built from.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod macros;

pub mod clock;
pub mod error;
pub mod execution;
pub mod id;
pub mod ids;
pub mod lifecycle;
pub mod metadata;
pub mod signal;
pub mod snapshot;
pub mod state;
pub mod tracker;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::RunError;
pub use execution::{Execution, ExecutionError, OutputObserver};
pub use ids::{JobId, RunId, RunRef};
pub use lifecycle::Lifecycle;
pub use metadata::{Parameter, RunMetadata};
pub use signal::Signal;
pub use snapshot::{
    ExecutionErrorSnapshot, OutputRing, Snapshot, ERROR_OUTPUT_RING_CAPACITY, OUTPUT_RING_CAPACITY,
};
pub use state::{Flag, State};
pub use tracker::{OperationHandle, TaskTracker, TrackedOperation, TrackedProgress, TrackedTask, TrackedTaskObserver, Warn};
