// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregated clash results
//!
//! The result interface consumed by the report layer: an ordered list of
//! clash-set names, each mapping clash keys (`"{a}-{b}"`) to the contact
//! record for that element pair.

use crate::types::GlobalId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A confirmed clash between two elements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clash {
    /// Global id of the element from group "a"
    pub a_global_id: GlobalId,
    /// Global id of the element from group "b"
    pub b_global_id: GlobalId,
    /// World-space contact point
    pub contact_point: [f64; 3],
    /// World-space contact normal (unit length, pointing from "a" into "b")
    pub contact_normal: [f64; 3],
    /// Overlap magnitude along the separating axis found by the exact test
    pub penetration_depth: f64,
}

/// Build the stable map key for a clash between two elements
pub fn clash_key(a: &GlobalId, b: &GlobalId) -> String {
    format!("{a}-{b}")
}

/// Results of one executed clash set
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClashSetResults {
    /// Name of the clash set that produced these results
    pub name: String,
    /// Confirmed clashes keyed by `"{a_global_id}-{b_global_id}"`
    pub clashes: BTreeMap<String, Clash>,
}

impl ClashSetResults {
    /// Create an empty result set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clashes: BTreeMap::new(),
        }
    }

    /// Insert a clash under its canonical key
    pub fn insert(&mut self, clash: Clash) {
        let key = clash_key(&clash.a_global_id, &clash.b_global_id);
        self.clashes.insert(key, clash);
    }

    /// Number of clashes in this set
    pub fn len(&self) -> usize {
        self.clashes.len()
    }

    /// Check if the set found no clashes
    pub fn is_empty(&self) -> bool {
        self.clashes.is_empty()
    }
}
