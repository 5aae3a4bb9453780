// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound event dispatch: one unbound datagram socket per dispatcher,
//! fanned out to every listener socket matching a fixed extension under the
//! socket directory.

use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use phaser_core::RunMetadata;
use serde::Serialize;

use crate::wire::{Envelope, EventMetadata};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to bind dispatch socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to scan socket directory {0}: {1}")]
    ScanDir(PathBuf, #[source] std::io::Error),
}

/// Sends one event type, fire-and-forget, to every socket in `dir` whose
/// filename ends in `extension`. A send failure to one listener is logged
/// and does not stop delivery to the others.
pub struct EventDispatcher {
    socket: UnixDatagram,
    dir: PathBuf,
    extension: &'static str,
}

impl EventDispatcher {
    pub fn new(dir: PathBuf, extension: &'static str) -> Result<Self, DispatchError> {
        let socket = UnixDatagram::unbound().map_err(DispatchError::Bind)?;
        Ok(Self { socket, dir, extension })
    }

    /// Serializes `{event_metadata, instance_metadata, event}` once and sends
    /// it to every matching listener socket currently present in the
    /// directory. Per-listener send failures (a dead or non-draining
    /// receiver) are logged at `warn` and otherwise ignored.
    pub fn dispatch<E: Serialize>(
        &self,
        metadata: &RunMetadata,
        event_type: &str,
        event: &E,
    ) -> Result<(), DispatchError> {
        let envelope = Envelope {
            event_metadata: EventMetadata::new(event_type),
            instance_metadata: metadata.clone(),
            event,
        };
        let payload = serde_json::to_vec(&envelope)?;

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DispatchError::ScanDir(self.dir.clone(), e)),
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !is_listener_socket(&path, self.extension) {
                continue;
            }
            if let Err(e) = self.socket.send_to(&payload, &path) {
                tracing::warn!(target = %path.display(), error = %e, "dispatch failed, dropping for this listener");
            }
        }
        Ok(())
    }
}

fn is_listener_socket(path: &Path, extension: &str) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(extension))
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
