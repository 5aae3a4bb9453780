// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`Execution`] bodies shipped with the crate: an in-process
//! closure for the Runner's own tests, and the thinnest possible bridge to a
//! real subprocess.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use phaser_core::{Execution, ExecutionError, OutputObserver, Parameter, State};

/// Wraps an in-process closure as an `Execution`. The closure receives no
/// arguments and returns the same `Result<State, ExecutionError>` contract
/// as any other Execution body; used by this crate's own Runner tests in
/// place of a real subprocess.
pub struct ClosureExecution {
    body: Mutex<Box<dyn FnMut() -> Result<State, ExecutionError> + Send>>,
    interrupted: AtomicBool,
}

impl ClosureExecution {
    pub fn new(body: impl FnMut() -> Result<State, ExecutionError> + Send + 'static) -> Self {
        Self { body: Mutex::new(Box::new(body)), interrupted: AtomicBool::new(false) }
    }
}

impl Execution for ClosureExecution {
    fn execute(&self) -> Result<State, ExecutionError> {
        (self.body.lock().unwrap_or_else(|e| e.into_inner()))()
    }

    fn stop(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    fn add_output_observer(&self, _observer: Arc<dyn OutputObserver>) {
        // A closure produces no output lines of its own; callers that need
        // output should push through their closure's captured state instead.
    }

    fn remove_output_observer(&self, _observer: &Arc<dyn OutputObserver>) {}
}

/// Spawns `command` via `std::process::Command`, streaming stdout/stderr
/// lines to registered output observers as they arrive. Exit code `0` maps
/// to `Completed`, any other code to `Failed`. Deliberately minimal: no
/// shell quoting helpers, no retry policy, no timeout.
pub struct ShellExecution {
    program: String,
    args: Vec<String>,
    observers: Arc<Mutex<Vec<Arc<dyn OutputObserver>>>>,
    interrupted: Arc<AtomicBool>,
    child: Arc<Mutex<Option<std::process::Child>>>,
}

impl ShellExecution {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            observers: Arc::new(Mutex::new(Vec::new())),
            interrupted: Arc::new(AtomicBool::new(false)),
            child: Arc::new(Mutex::new(None)),
        }
    }

    fn notify(observers: &Mutex<Vec<Arc<dyn OutputObserver>>>, line: &str, is_error: bool) {
        let observers = observers.lock().unwrap_or_else(|e| e.into_inner());
        for observer in observers.iter() {
            observer.on_output(line, is_error);
        }
    }
}

impl Execution for ShellExecution {
    fn execute(&self) -> Result<State, ExecutionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutionError::new(format!("spawn failed: {e}"), State::StartFailed))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let observers = self.observers.clone();
        *self.child.lock().unwrap_or_else(|e| e.into_inner()) = Some(child);

        let stdout_handle = stdout.map(|out| {
            let observers = observers.clone();
            std::thread::spawn(move || {
                for line in BufReader::new(out).lines().map_while(Result::ok) {
                    Self::notify(&observers, &line, false);
                }
            })
        });
        let stderr_handle = stderr.map(|err| {
            std::thread::spawn(move || {
                for line in BufReader::new(err).lines().map_while(Result::ok) {
                    Self::notify(&observers, &line, true);
                }
            })
        });

        let status = {
            let mut guard = self.child.lock().unwrap_or_else(|e| e.into_inner());
            let child = guard
                .as_mut()
                .ok_or_else(|| ExecutionError::new("child process vanished before wait", State::Failed))?;
            child.wait().map_err(|e| ExecutionError::new(format!("wait failed: {e}"), State::Failed))?
        };
        if let Some(h) = stdout_handle {
            let _ = h.join();
        }
        if let Some(h) = stderr_handle {
            let _ = h.join();
        }

        if status.success() {
            Ok(State::Completed)
        } else if self.interrupted.load(Ordering::SeqCst) {
            Ok(State::Interrupted)
        } else {
            Ok(State::Failed)
        }
    }

    fn stop(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
        if let Some(child) = self.child.lock().unwrap_or_else(|e| e.into_inner()).as_mut() {
            let _ = child.kill();
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    fn add_output_observer(&self, observer: Arc<dyn OutputObserver>) {
        self.observers.lock().unwrap_or_else(|e| e.into_inner()).push(observer);
    }

    fn remove_output_observer(&self, observer: &Arc<dyn OutputObserver>) {
        self.observers.lock().unwrap_or_else(|e| e.into_inner()).retain(|o| !Arc::ptr_eq(o, observer));
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::new("command", format!("{} {}", self.program, self.args.join(" ")))]
    }
}

#[cfg(test)]
#[path = "execution_adapters_tests.rs"]
mod tests;
