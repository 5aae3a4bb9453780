// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The network boundary: serializes lifecycle and output events to local
//! Unix-domain datagram sockets under a per-user directory, and decodes them
//! back on the receiving side. Fire-and-forget, unordered across disjoint
//! processes, best-effort under receiver death.

pub mod dispatcher;
pub mod output_dispatcher;
pub mod phase_dispatcher;
pub mod receiver;
pub mod socket_dir;
pub mod wire;

pub use dispatcher::{DispatchError, EventDispatcher};
pub use output_dispatcher::OutputDispatcher;
pub use phase_dispatcher::PhaseDispatcher;
pub use receiver::{EventReceiver, ReceiverError};
pub use socket_dir::{ensure_socket_dir, socket_dir, unique_socket_path, OUTPUT_EXTENSION, PHASE_EXTENSION};
pub use wire::{
    truncate_output, Envelope, EventMetadata, OutputEvent, Phase, PhaseTransitionEvent, MAX_OUTPUT_BYTES,
    OUTPUT_EVENT_TYPE, PHASE_EVENT_TYPE,
};
