// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! Generic hierarchical instance state.
//!
//! When the host tears a view hierarchy down (a configuration change, a
//! process handoff) it asks each widget to save itself, and each widget wraps
//! its own opaque record around whatever its base layer saved. The host only
//! ever sees [`SavedState`] values; it never needs to understand any widget's
//! payload to persist or restore a whole hierarchy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One level of saved instance state: an opaque payload plus the state saved
/// by the layer below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    payload: Value,
    base: Option<Box<SavedState>>,
}

impl SavedState {
    /// State with no nested base layer.
    pub fn leaf(payload: Value) -> Self {
        Self {
            payload,
            base: None,
        }
    }

    /// Wrap a payload around the state saved by the layer below.
    pub fn wrap(payload: Value, base: Self) -> Self {
        Self {
            payload,
            base: Some(Box::new(base)),
        }
    }

    /// This level's payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Split into payload and nested base state.
    pub fn into_parts(self) -> (Value, Option<Self>) {
        (self.payload, self.base.map(|base| *base))
    }
}
