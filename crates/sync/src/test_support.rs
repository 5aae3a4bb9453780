// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only helpers shared across coordinator unit tests.

use std::collections::HashMap;

use phaser_core::{JobId, Lifecycle, OutputRing, RunId, RunMetadata, RunRef, Snapshot, TaskTracker};

pub fn sample_snapshot(job_id: &str) -> Snapshot {
    sample_snapshot_for(RunRef::new(JobId::from(job_id), RunId::generate(0)))
}

pub fn sample_snapshot_for(run_ref: RunRef) -> Snapshot {
    Snapshot {
        metadata: RunMetadata::new(run_ref),
        lifecycle: Lifecycle::new(),
        tracker: TaskTracker::new("task").tracked_task(),
        last_status: None,
        output: OutputRing::new(10),
        error_output: OutputRing::new(1000),
        warnings: HashMap::new(),
        exec_error: None,
    }
}
