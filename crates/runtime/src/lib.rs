// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The phaser runtime: drives a single run through coordination and
//! execution, and the observer plumbing ([`Runner`]) broadcasts its
//! transitions through.

pub mod channels;
pub mod execution_adapters;
pub mod observer;
pub mod runner;

pub use channels::{default_error_hook, global_channels, ObserverChannels, StateObserver, WarningObserver};
pub use execution_adapters::{ClosureExecution, ShellExecution};
pub use observer::{ErrorHook, PriorityRegistry, TracingErrorHook};
pub use runner::{runner_parameters, Runner};
