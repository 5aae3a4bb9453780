// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination primitives: the reentrant process lock a [`Runner`] holds
//! while deciding whether a run may proceed, and the [`Coordinator`] policies
//! that make that decision.
//!
//! [`Runner`]: https://docs.rs/phaser-runtime

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod coordinator;
pub mod coordinators;
pub mod locker;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use coordinator::{Coordinator, DEFAULT_WAIT_POLL};
pub use coordinators::{Composite, Dependency, Latch, NoOverlap, NoSync, Parallel, Serial};
pub use locker::{Locker, MutexLocker, NullLocker, Section};
pub use registry::CoordinatorRegistry;
