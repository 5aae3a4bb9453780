// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only record of `(state, timestamp)` transitions for one run.

use chrono::{DateTime, Utc};

use crate::state::State;

/// Ordered sequence of phase transitions for a single run.
///
/// Invariants enforced by [`Lifecycle::set_state`]:
/// (i) timestamps are monotonically non-decreasing — enforced by clamping to
///     the previous transition's timestamp if a caller supplies an earlier one;
/// (ii) the same state is never recorded twice in succession;
/// (iii) exactly one terminal state is ever recorded;
/// (iv) once terminal, no further transitions are accepted.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lifecycle {
    transitions: Vec<(State, DateTime<Utc>)>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self { transitions: Vec::new() }
    }

    /// Appends `(state, now)` iff `state != None`, `state` differs from the
    /// current state, and the lifecycle has not already reached a terminal
    /// state. Returns whether the transition was recorded.
    pub fn set_state(&mut self, state: State, now: DateTime<Utc>) -> bool {
        if state == State::None || state == self.state() {
            return false;
        }
        if self.state().is_terminal() {
            return false;
        }
        let now = match self.transitions.last() {
            Some((_, last)) if now < *last => *last,
            _ => now,
        };
        self.transitions.push((state, now));
        true
    }

    /// The most recently appended state, or `None` if no transition has occurred.
    pub fn state(&self) -> State {
        self.transitions.last().map(|(s, _)| *s).unwrap_or(State::None)
    }

    pub fn states(&self) -> Vec<State> {
        self.transitions.iter().map(|(s, _)| *s).collect()
    }

    pub fn state_changes(&self) -> &[(State, DateTime<Utc>)] {
        &self.transitions
    }

    /// Timestamp of the first transition into `state`, if it occurred.
    pub fn changed(&self, state: State) -> Option<DateTime<Utc>> {
        self.transitions.iter().find(|(s, _)| *s == state).map(|(_, t)| *t)
    }

    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.transitions.last().map(|(_, t)| *t)
    }

    /// Timestamp of the first transition into any `Executing`-flagged state.
    pub fn execution_start(&self) -> Option<DateTime<Utc>> {
        self.transitions.iter().find(|(s, _)| s.is_executing()).map(|(_, t)| *t)
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
