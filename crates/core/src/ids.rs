// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run identity: `(job_id, run_id)`.

use std::sync::atomic::{AtomicU64, Ordering};

/// User-chosen name of the job being run. Arbitrary length, opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Per-run identifier. Defaults to a monotonic per-process hex timestamp;
/// uniqueness within a process is an invariant enforced by an internal counter
/// that disambiguates runs created within the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RunId(pub crate::id::IdBuf);

static RUN_SEQ: AtomicU64 = AtomicU64::new(0);

impl RunId {
    /// Generate a new run id: `<hex epoch ms>-<hex sequence>`.
    pub fn generate(epoch_ms: u64) -> Self {
        let seq = RUN_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(crate::id::IdBuf::new(&format!("{:x}-{:x}", epoch_ms, seq)))
    }

    pub fn from_string(s: impl AsRef<str>) -> Self {
        Self(crate::id::IdBuf::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

/// `(job_id, run_id)` identity of one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RunRef {
    pub job_id: JobId,
    pub run_id: RunId,
}

impl RunRef {
    pub fn new(job_id: impl Into<JobId>, run_id: RunId) -> Self {
        Self { job_id: job_id.into(), run_id }
    }
}

impl std::fmt::Display for RunRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.job_id, self.run_id)
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
