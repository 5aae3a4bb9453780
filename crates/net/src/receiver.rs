// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound datagram server: binds a unique socket under the listener
//! directory, decodes envelopes, and dispatches matching events to an
//! in-process handler.

use std::marker::PhantomData;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use phaser_core::{RunMetadata, RunRef};
use serde::de::DeserializeOwned;

use crate::socket_dir::{unique_socket_path, OUTPUT_EXTENSION, PHASE_EXTENSION};
use crate::wire::{Envelope, OutputEvent, PhaseTransitionEvent, OUTPUT_EVENT_TYPE, PHASE_EVENT_TYPE};

#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    #[error("failed to bind receiver socket {0}: {1}")]
    Bind(PathBuf, #[source] std::io::Error),
    #[error("failed to receive datagram: {0}")]
    Recv(#[source] std::io::Error),
}

/// Maximum single-datagram size this receiver will accept.
const MAX_DATAGRAM_BYTES: usize = 64 * 1024;

/// Datagram server decoding envelopes of event type `E`. Construct via
/// [`EventReceiver::bind_phase`] / [`EventReceiver::bind_output`].
pub struct EventReceiver<E> {
    socket: UnixDatagram,
    path: PathBuf,
    allow_ping: bool,
    event_type: &'static str,
    event_types: Option<Vec<String>>,
    id_match: Option<Box<dyn Fn(&RunRef) -> bool + Send + Sync>>,
    _marker: PhantomData<E>,
}

impl<E: DeserializeOwned + Send + 'static> EventReceiver<E> {
    fn bind(dir: &Path, extension: &str, event_type: &'static str) -> Result<Self, ReceiverError> {
        let path = unique_socket_path(dir, extension);
        let socket = UnixDatagram::bind(&path).map_err(|e| ReceiverError::Bind(path.clone(), e))?;
        Ok(Self {
            socket,
            path,
            allow_ping: true,
            event_type,
            event_types: None,
            id_match: None,
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When `false`, zero-length datagrams are decoded (and rejected) like
    /// any other payload instead of being treated as a liveness probe.
    pub fn allow_ping(mut self, allow_ping: bool) -> Self {
        self.allow_ping = allow_ping;
        self
    }

    /// Restricts delivery to envelopes whose `event_metadata.event_type` is
    /// in `types`.
    pub fn event_types(mut self, types: Vec<String>) -> Self {
        self.event_types = Some(types);
        self
    }

    /// Restricts delivery to envelopes whose instance id matches `predicate`.
    pub fn id_match(mut self, predicate: impl Fn(&RunRef) -> bool + Send + Sync + 'static) -> Self {
        self.id_match = Some(Box::new(predicate));
        self
    }

    /// Blocks for one datagram and, if it decodes to a deliverable event,
    /// invokes `handler`. Returns `Ok(true)` if an event was delivered,
    /// `Ok(false)` if the datagram was a ping or was filtered/rejected.
    pub fn recv_one(&self, handler: &mut dyn FnMut(RunMetadata, E)) -> Result<bool, ReceiverError> {
        let mut buf = [0u8; MAX_DATAGRAM_BYTES];
        let n = self.socket.recv(&mut buf).map_err(ReceiverError::Recv)?;

        if n == 0 {
            if !self.allow_ping {
                tracing::warn!(path = %self.path.display(), "empty datagram rejected, allow_ping disabled");
            }
            return Ok(false);
        }

        let envelope: Envelope<serde_json::Value> = match serde_json::from_slice(&buf[..n]) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "dropping malformed envelope");
                return Ok(false);
            }
        };

        if envelope.event_metadata.event_type != self.event_type {
            return Ok(false);
        }
        if let Some(allow) = &self.event_types {
            if !allow.contains(&envelope.event_metadata.event_type) {
                return Ok(false);
            }
        }
        if let Some(predicate) = &self.id_match {
            if !predicate(&envelope.instance_metadata.id) {
                return Ok(false);
            }
        }

        let event: E = match serde_json::from_value(envelope.event) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "dropping envelope with missing or invalid event fields");
                return Ok(false);
            }
        };

        handler(envelope.instance_metadata, event);
        Ok(true)
    }

    /// Runs `recv_one` in a loop on a dedicated thread until the process
    /// exits or the socket is closed; receive errors are logged and do not
    /// stop the loop, matching dispatcher-side best-effort delivery.
    pub fn serve(self: Arc<Self>, mut handler: impl FnMut(RunMetadata, E) + Send + 'static) -> std::thread::JoinHandle<()>
    where
        E: Sync,
    {
        std::thread::spawn(move || loop {
            match self.recv_one(&mut handler) {
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "receiver loop error, continuing");
                }
            }
        })
    }
}

impl EventReceiver<PhaseTransitionEvent> {
    pub fn bind_phase(dir: &Path) -> Result<Self, ReceiverError> {
        Self::bind(dir, PHASE_EXTENSION, PHASE_EVENT_TYPE)
    }
}

impl EventReceiver<OutputEvent> {
    pub fn bind_output(dir: &Path) -> Result<Self, ReceiverError> {
        Self::bind(dir, OUTPUT_EXTENSION, OUTPUT_EVENT_TYPE)
    }
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
