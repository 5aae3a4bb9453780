// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run metadata: everything about a run that is immutable after construction.

use std::collections::HashMap;

use crate::ids::RunRef;

/// A single static parameter contributed by an Execution or a Coordinator,
/// exposed for metadata/display purposes only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Immutable description of a run, fixed at construction time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunMetadata {
    pub id: RunRef,
    /// Union of the Execution's and Coordinator's static parameters.
    pub parameters: Vec<Parameter>,
    /// Free-form parameters supplied by the caller.
    pub user_params: HashMap<String, String>,
    /// Name of the group a pending/waiting run belongs to, if any.
    pub pending_group: Option<String>,
}

impl RunMetadata {
    pub fn new(id: RunRef) -> Self {
        Self { id, parameters: Vec::new(), user_params: HashMap::new(), pending_group: None }
    }

    crate::setters! {
        set {
            parameters: Vec<Parameter>,
            user_params: HashMap<String, String>,
        }
        option {
            pending_group: String,
        }
    }
}
