// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A no-op coordinator: always signals `Continue`. Used as a `Composite`
//! member when a run needs a static parameter or placeholder slot but no
//! actual gating.

use phaser_core::{Signal, Snapshot, State};

use crate::coordinator::Coordinator;

pub struct NoSync;

impl Coordinator for NoSync {
    fn set_signal(&self, _snapshot: &Snapshot) -> Signal {
        Signal::Continue
    }

    fn exec_state(&self) -> State {
        State::None
    }

    fn release(&self) {}
}
