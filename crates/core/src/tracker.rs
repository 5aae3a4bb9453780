// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical task/operation/progress model, updated from output parsing.
//!
//! A [`TaskTracker`] is a tree: each node tracks a current event, a set of
//! named operations with progress, a result, and subtasks. Every mutation
//! touches `last_updated_at` (and `first_updated_at` the first time) and
//! fires a `new_task_update` notification that bubbles up through the
//! parent chain, so an observer registered on the root sees updates from
//! any subtask.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::clock::Clock;

/// Observer of task-tree mutations. Receives no payload: callers re-read
/// `tracked_task()` for the current view, matching the append-only,
/// re-snapshot-on-notify style used for state/output observers.
pub trait TrackedTaskObserver: Send + Sync {
    fn new_task_update(&self);
}

/// A single warning recorded against a task.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Warn {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Warn {
    pub fn new(category: impl Into<String>) -> Self {
        Self { category: category.into(), params: None }
    }

    pub fn with_params(category: impl Into<String>, params: serde_json::Value) -> Self {
        Self { category: category.into(), params: Some(params) }
    }
}

/// Immutable view of a (completed, total, unit) progress triple.
///
/// `pct_done` is defined only when both `completed` and `total` are numeric.
/// `finished` holds iff `completed == total` and both are numeric and non-zero,
/// matching the source's truthy-and semantics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackedProgress {
    pub completed: Option<f64>,
    pub total: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

impl TrackedProgress {
    pub fn pct_done(&self) -> Option<f64> {
        match (self.completed, self.total) {
            (Some(c), Some(t)) if t != 0.0 => Some(c / t),
            _ => None,
        }
    }

    pub fn finished(&self) -> bool {
        match (self.completed, self.total) {
            (Some(c), Some(t)) => c != 0.0 && t != 0.0 && c == t,
            _ => false,
        }
    }
}

impl std::fmt::Display for TrackedProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.completed {
            Some(c) => write!(f, "{c}")?,
            None => write!(f, "?")?,
        }
        if let Some(t) = self.total {
            write!(f, "/{t}")?;
        }
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(pct) = self.pct_done() {
            write!(f, " ({:.0}%)", (pct * 100.0).round())?;
        }
        Ok(())
    }
}

/// Accepts `"<number><unit>"` or `"<number> <unit>"`. The unit is whatever
/// non-numeric, non-whitespace trailer follows the number; absent if there
/// isn't one.
fn parse_progress_value(value: &str) -> Result<(f64, String), ProgressParseError> {
    let trimmed = value.trim_start();
    let digits_end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    if digits_end == 0 {
        return Err(ProgressParseError(value.to_string()));
    }
    let number: f64 =
        trimmed[..digits_end].parse().map_err(|_| ProgressParseError(value.to_string()))?;
    let unit = trimmed[digits_end..].trim_start().to_string();
    Ok((number, unit))
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("progress value must be formatted as \"<number><unit>\" or \"<number> <unit>\", got: {0:?}")]
pub struct ProgressParseError(String);

/// Mutable accumulator behind one operation's progress triple.
#[derive(Debug, Default)]
struct ProgressState {
    completed: Option<f64>,
    total: Option<f64>,
    unit: String,
}

impl ProgressState {
    fn snapshot(&self) -> TrackedProgress {
        TrackedProgress { completed: self.completed, total: self.total, unit: self.unit.clone() }
    }

    fn apply_numeric(&mut self, value: f64, unit: String, increment: bool) {
        if increment {
            self.completed = Some(self.completed.unwrap_or(0.0) + value);
        } else {
            self.completed = Some(value);
        }
        if !unit.is_empty() {
            self.unit = unit;
        }
    }

    fn set_total(&mut self, value: f64, unit: String) {
        self.total = Some(value);
        if !unit.is_empty() {
            self.unit = unit;
        }
    }
}

/// Handle returned by [`TaskTrackerHandle::operation`] for updating one operation's progress.
pub struct OperationHandle {
    inner: Arc<Mutex<OperationInner>>,
}

struct OperationInner {
    name: String,
    progress: ProgressState,
    first_updated_at: Option<DateTime<Utc>>,
    last_updated_at: Option<DateTime<Utc>>,
    active: bool,
}

impl OperationHandle {
    fn touch(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.first_updated_at.is_none() {
            inner.first_updated_at = Some(now);
        }
        inner.last_updated_at = Some(now);
    }

    /// `update(completed, total, unit, increment)`. `increment=true` adds to the
    /// current completed value instead of replacing it.
    pub fn update(
        &self,
        clock: &impl Clock,
        completed: &str,
        total: Option<&str>,
        unit: &str,
        increment: bool,
    ) -> Result<(), ProgressParseError> {
        let (value, parsed_unit) = parse_progress_value(completed)?;
        {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.progress.apply_numeric(value, parsed_unit, increment);
            if let Some(total) = total {
                let (t, t_unit) = parse_progress_value(total)?;
                inner.progress.set_total(t, t_unit);
            }
            if !unit.is_empty() {
                inner.progress.unit = unit.to_string();
            }
        }
        self.touch(clock.now_utc());
        Ok(())
    }

    pub fn set_unit(&self, clock: &impl Clock, unit: impl Into<String>) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).progress.unit = unit.into();
        self.touch(clock.now_utc());
    }

    pub fn deactivate(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).active = false;
    }

    pub fn snapshot(&self) -> TrackedOperation {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        TrackedOperation {
            name: inner.name.clone(),
            progress: Some(inner.progress.snapshot()),
            first_updated_at: inner.first_updated_at,
            last_updated_at: inner.last_updated_at,
            active: inner.active,
        }
    }
}

/// Immutable view of one operation at a point in time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackedOperation {
    pub name: String,
    pub progress: Option<TrackedProgress>,
    pub first_updated_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl std::fmt::Display for TrackedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.name.is_empty() {
            parts.push(self.name.clone());
        }
        if let Some(progress) = &self.progress {
            parts.push(progress.to_string());
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Immutable view of a task and its subtree at a point in time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackedTask {
    pub name: String,
    pub current_event: Option<(String, Option<DateTime<Utc>>)>,
    pub operations: Vec<TrackedOperation>,
    pub result: Option<String>,
    pub subtasks: Vec<TrackedTask>,
    pub warnings: Vec<Warn>,
    pub first_updated_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl std::fmt::Display for TrackedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if self.active {
            if !self.name.is_empty() {
                parts.push(format!("{}:", self.name));
            }
            if let Some(result) = &self.result {
                parts.push(result.clone());
                return write!(f, "{}", parts.join(" "));
            }

            let mut statuses: Vec<String> = Vec::new();
            if let Some((name, _ts)) = &self.current_event {
                statuses.push(name.clone());
            }
            statuses.extend(self.operations.iter().filter(|op| op.active).map(|op| op.to_string()));
            if !statuses.is_empty() {
                parts.push(statuses.join(" | "));
            }
        }

        if !self.subtasks.is_empty() {
            if !parts.is_empty() {
                parts.push("/".to_string());
            }
            let active_subtasks: Vec<String> =
                self.subtasks.iter().filter(|t| t.active).map(|t| t.to_string()).collect();
            parts.push(active_subtasks.join(" / "));
        }

        write!(f, "{}", parts.join(" "))
    }
}

struct TaskTrackerInner {
    name: String,
    current_event: Option<(String, Option<DateTime<Utc>>)>,
    operations: IndexMap<String, Arc<Mutex<OperationInner>>>,
    subtasks: IndexMap<String, TaskTracker>,
    result: Option<String>,
    warnings: Vec<Warn>,
    first_updated_at: Option<DateTime<Utc>>,
    last_updated_at: Option<DateTime<Utc>>,
    active: bool,
}

/// A node in the task tree. Cheap to clone — clones share the same underlying state.
#[derive(Clone)]
pub struct TaskTracker {
    inner: Arc<Mutex<TaskTrackerInner>>,
    observers: Arc<Mutex<Vec<Arc<dyn TrackedTaskObserver>>>>,
}

impl TaskTracker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TaskTrackerInner {
                name: name.into(),
                current_event: None,
                operations: IndexMap::new(),
                subtasks: IndexMap::new(),
                result: None,
                warnings: Vec::new(),
                first_updated_at: None,
                last_updated_at: None,
                active: true,
            })),
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_observer(&self, observer: Arc<dyn TrackedTaskObserver>) {
        self.observers.lock().unwrap_or_else(|e| e.into_inner()).push(observer);
    }

    fn notify_update(&self) {
        let observers = self.observers.lock().unwrap_or_else(|e| e.into_inner()).clone();
        for observer in observers {
            observer.new_task_update();
        }
    }

    fn touch(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.first_updated_at.is_none() {
            inner.first_updated_at = Some(now);
        }
        inner.last_updated_at = Some(now);
    }

    pub fn event(&self, clock: &impl Clock, name: impl Into<String>, timestamp: Option<DateTime<Utc>>) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).current_event = Some((name.into(), timestamp));
        self.touch(clock.now_utc());
        self.notify_update();
    }

    /// Returns the named operation's handle, creating it (and notifying) if absent.
    pub fn operation(&self, clock: &impl Clock, name: impl Into<String>) -> OperationHandle {
        let name = name.into();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let created = !inner.operations.contains_key(&name);
        let state = inner.operations.entry(name.clone()).or_insert_with(|| {
            Arc::new(Mutex::new(OperationInner {
                name: name.clone(),
                progress: ProgressState::default(),
                first_updated_at: None,
                last_updated_at: None,
                active: true,
            }))
        });
        let handle = OperationHandle { inner: state.clone() };
        drop(inner);
        if created {
            self.touch(clock.now_utc());
            self.notify_update();
        }
        handle
    }

    /// Returns the named subtask, creating it (and bubbling its future
    /// updates to this task's observers) if absent.
    pub fn task(&self, clock: &impl Clock, name: impl Into<String>) -> TaskTracker {
        let name = name.into();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let created = !inner.subtasks.contains_key(&name);
        let child = inner.subtasks.entry(name.clone()).or_insert_with(|| TaskTracker::new(name.clone())).clone();
        drop(inner);
        if created {
            let parent = self.clone();
            child.add_observer(Arc::new(BubbleObserver { parent }));
            self.touch(clock.now_utc());
            self.notify_update();
        }
        child
    }

    pub fn result(&self, clock: &impl Clock, result: impl Into<String>) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).result = Some(result.into());
        self.touch(clock.now_utc());
        self.notify_update();
    }

    pub fn warning(&self, clock: &impl Clock, warn: Warn) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).warnings.push(warn);
        self.touch(clock.now_utc());
        self.notify_update();
    }

    pub fn failure(&self, clock: &impl Clock, fault_type: impl Into<String>, reason: impl Into<String>) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).result =
            Some(format!("{}: {}", fault_type.into(), reason.into()));
        self.touch(clock.now_utc());
        self.notify_update();
    }

    pub fn deactivate(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).active = false;
    }

    pub fn tracked_task(&self) -> TrackedTask {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        TrackedTask {
            name: inner.name.clone(),
            current_event: inner.current_event.clone(),
            operations: inner.operations.values().map(|op| OperationHandle { inner: op.clone() }.snapshot()).collect(),
            result: inner.result.clone(),
            subtasks: inner.subtasks.values().map(|t| t.tracked_task()).collect(),
            warnings: inner.warnings.clone(),
            first_updated_at: inner.first_updated_at,
            last_updated_at: inner.last_updated_at,
            active: inner.active,
        }
    }
}

struct BubbleObserver {
    parent: TaskTracker,
}

impl TrackedTaskObserver for BubbleObserver {
    fn new_task_update(&self) {
        self.parent.notify_update();
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
