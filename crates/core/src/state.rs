// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The phase/state enumeration governing one run, and its flag queries.

/// A value in the run's phase enumeration. Ordered by progression:
/// `None < Created < Waiting < Running < Triggered < Started < Completed
/// < Cancelled < Stopped < StartFailed < Interrupted < Failed < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum State {
    None,
    Created,
    Waiting,
    Running,
    Triggered,
    Started,
    Completed,
    Cancelled,
    Stopped,
    StartFailed,
    Interrupted,
    Failed,
    Error,
}

crate::simple_display! {
    State {
        None => "none",
        Created => "created",
        Waiting => "waiting",
        Running => "running",
        Triggered => "triggered",
        Started => "started",
        Completed => "completed",
        Cancelled => "cancelled",
        Stopped => "stopped",
        StartFailed => "start_failed",
        Interrupted => "interrupted",
        Failed => "failed",
        Error => "error",
    }
}

/// A single flag in a state's fixed, queryable membership set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    BeforeExecution,
    Executing,
    Terminal,
    Waiting,
    Nonsuccess,
    Success,
    Unexecuted,
    Aborted,
}

impl State {
    /// Fixed flag membership for this state.
    ///
    /// `BeforeExecution`/`Executing`/`Terminal` follow the ordinal ranges of
    /// `ExecutionState.is_before_execution`/`is_executing`/`is_terminal`.
    /// The remaining flags classify *how* a terminal state was reached:
    /// cancellation before any execution started is both `Unexecuted` and
    /// `Aborted`; a stop or interrupt mid-execution is `Aborted` only;
    /// ordinary failures are neither.
    pub fn flags(self) -> &'static [Flag] {
        use Flag::*;
        match self {
            State::None => &[],
            State::Created => &[BeforeExecution],
            State::Waiting => &[BeforeExecution, Flag::Waiting],
            State::Running | State::Triggered | State::Started => &[Executing],
            State::Completed => &[Terminal, Success],
            State::Cancelled => &[Terminal, Nonsuccess, Unexecuted, Aborted],
            State::Stopped => &[Terminal, Nonsuccess, Aborted],
            State::StartFailed => &[Terminal, Nonsuccess, Unexecuted],
            State::Interrupted => &[Terminal, Nonsuccess, Aborted],
            State::Failed | State::Error => &[Terminal, Nonsuccess],
        }
    }

    pub fn has_flag(self, flag: Flag) -> bool {
        self.flags().contains(&flag)
    }

    pub fn is_before_execution(self) -> bool {
        self.has_flag(Flag::BeforeExecution)
    }

    pub fn is_executing(self) -> bool {
        self.has_flag(Flag::Executing)
    }

    pub fn is_terminal(self) -> bool {
        self.has_flag(Flag::Terminal)
    }

    pub fn is_waiting(self) -> bool {
        self.has_flag(Flag::Waiting)
    }

    pub fn is_nonsuccess(self) -> bool {
        self.has_flag(Flag::Nonsuccess)
    }

    pub fn is_success(self) -> bool {
        self.has_flag(Flag::Success)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
