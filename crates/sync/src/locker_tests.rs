// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::*;

#[test]
fn mutex_locker_is_reentrant_on_same_thread() {
    let locker = MutexLocker::new();
    let outer = locker.acquire();
    let inner = locker.acquire(); // must not deadlock
    drop(inner);
    drop(outer);
}

#[test]
fn mutex_locker_excludes_other_threads_while_held() {
    let locker = Arc::new(MutexLocker::new());
    let entered = Arc::new(AtomicU32::new(0));

    let _section = locker.acquire();

    let locker2 = locker.clone();
    let entered2 = entered.clone();
    let handle = thread::spawn(move || {
        let _s = locker2.acquire();
        entered2.fetch_add(1, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(20));
    assert_eq!(entered.load(Ordering::SeqCst), 0, "other thread should be blocked");

    drop(_section);
    handle.join().expect("thread");
    assert_eq!(entered.load(Ordering::SeqCst), 1);
}

#[test]
fn unlock_and_wait_releases_section_for_other_threads() {
    let locker = Arc::new(MutexLocker::new());
    let entered = Arc::new(AtomicU32::new(0));

    let mut section = locker.acquire();

    let locker2 = locker.clone();
    let entered2 = entered.clone();
    let handle = thread::spawn(move || {
        let _s = locker2.acquire();
        entered2.fetch_add(1, Ordering::SeqCst);
    });

    // While we block in unlock_and_wait, the section is released so the
    // other thread can acquire it.
    section.unlock_and_wait(Duration::from_millis(100));
    handle.join().expect("thread");
    assert_eq!(entered.load(Ordering::SeqCst), 1);
}

#[test]
fn notify_all_wakes_a_waiter_before_timeout() {
    let locker = Arc::new(MutexLocker::new());
    let woke_early = Arc::new(AtomicU32::new(0));

    let locker2 = locker.clone();
    let woke_early2 = woke_early.clone();
    let handle = thread::spawn(move || {
        let mut section = locker2.acquire();
        let start = std::time::Instant::now();
        section.unlock_and_wait(Duration::from_secs(5));
        if start.elapsed() < Duration::from_secs(1) {
            woke_early2.fetch_add(1, Ordering::SeqCst);
        }
    });

    thread::sleep(Duration::from_millis(50));
    locker.notify_all();
    handle.join().expect("thread");
    assert_eq!(woke_early.load(Ordering::SeqCst), 1);
}

#[test]
fn null_locker_unlock_and_wait_returns_without_blocking_real_state() {
    let locker = NullLocker;
    let mut section = locker.acquire();
    section.unlock_and_wait(Duration::from_millis(1));
}
