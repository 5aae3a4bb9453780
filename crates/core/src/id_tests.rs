// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_hash_map_lookup() {
    let mut map = HashMap::new();
    let id = TestId::new();
    map.insert(id, 42);
    assert_eq!(map.get(&id), Some(&42));
}

#[test]
fn define_id_round_trips_through_string() {
    let id = TestId::new();
    let parsed = TestId::from_string(id.as_str());
    assert_eq!(id, parsed);
}

#[test]
fn define_id_suffix_strips_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with(TestId::PREFIX));
    assert_eq!(id.suffix().len(), 19);
}

#[test]
fn define_id_short_truncates_suffix() {
    let id = TestId::new();
    assert_eq!(id.short(4).len(), 4);
    assert_eq!(id.short(100), id.suffix());
}

#[test]
fn define_id_new_generates_unique_ids() {
    let a = TestId::new();
    let b = TestId::new();
    assert_ne!(a, b);
}

// --- short() free function ---

#[test]
fn short_fn_truncates() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}

// --- IdBuf ---

#[test]
fn id_buf_as_str_round_trips() {
    let buf = IdBuf::new("job-abc123");
    assert_eq!(buf.as_str(), "job-abc123");
}

#[test]
fn id_buf_empty_is_empty() {
    assert!(IdBuf::empty().is_empty());
    assert!(!IdBuf::new("x").is_empty());
}

#[test]
fn id_buf_serde_round_trip() {
    let buf = IdBuf::new("job-abc123");
    let json = serde_json::to_string(&buf).expect("serialize");
    let back: IdBuf = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(buf, back);
}

#[test]
fn id_buf_serde_rejects_oversized() {
    let too_long = "x".repeat(ID_MAX_LEN + 1);
    let json = serde_json::to_string(&too_long).expect("serialize");
    let result: Result<IdBuf, _> = serde_json::from_str(&json);
    assert!(result.is_err());
}
