// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-user listener socket directory: `${TMPDIR:-/tmp}/<uid>/`.

use std::path::{Path, PathBuf};

/// Suffix for phase-transition listener sockets (historically `.tlistener`).
pub const PHASE_EXTENSION: &str = ".plistener";
/// Suffix for output listener sockets.
pub const OUTPUT_EXTENSION: &str = ".olistener";

/// The directory dispatchers scan and receivers bind sockets under.
pub fn socket_dir() -> PathBuf {
    let root = std::env::var_os("TMPDIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/tmp"));
    root.join(nix::unistd::Uid::current().to_string())
}

/// Creates the socket directory if it does not already exist.
pub fn ensure_socket_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// A fresh `<unique-hex><extension>` path under `dir`, not yet bound.
pub fn unique_socket_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(format!("{}{}", nanoid::nanoid!(16), extension))
}

#[cfg(test)]
#[path = "socket_dir_tests.rs"]
mod tests;
