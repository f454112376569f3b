// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted clash-set configuration
//!
//! A clash-set file is an ordered JSON list of clash-set records. Each
//! record names two lists of geometry sources ("a" and "b") and the
//! penetration-depth tolerance used to suppress negligible contacts.
//! The format matches the files written by the authoring UI:
//!
//! ```json
//! [
//!     {
//!         "name": "Structure vs Services",
//!         "tolerance": 0.01,
//!         "a": [{ "file": "structure.ifc" }],
//!         "b": [{ "file": "mep.ifc", "selector": ".IfcFlowSegment", "mode": "i" }]
//!     }
//! ]
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default penetration-depth tolerance in model units (meters)
pub const DEFAULT_TOLERANCE: f64 = 0.01;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// How a selection query filters the elements of a geometry source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Test all elements of the source
    #[serde(rename = "a")]
    All,
    /// Test only elements matched by the selector
    #[serde(rename = "i")]
    Include,
    /// Test all elements except those matched by the selector
    #[serde(rename = "e")]
    Exclude,
}

/// A reference to one geometry source within a clash set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClashSource {
    /// Model file providing the geometry
    pub file: String,
    /// Optional selection query narrowing the elements under test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Selection mode, only meaningful together with `selector`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SelectionMode>,
}

impl ClashSource {
    /// Create a source covering a whole file
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            selector: None,
            mode: None,
        }
    }

    /// Attach a selection query
    pub fn with_selector(mut self, selector: impl Into<String>, mode: SelectionMode) -> Self {
        self.selector = Some(selector.into());
        self.mode = Some(mode);
        self
    }
}

/// A named pairing of two element groups with a shared tolerance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClashSet {
    /// Clash-set name, reported with the results
    pub name: String,
    /// Minimum penetration depth for a contact to count as a clash
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// First group of geometry sources
    pub a: Vec<ClashSource>,
    /// Second group of geometry sources; empty for self-collision of "a"
    #[serde(default)]
    pub b: Vec<ClashSource>,
}

impl ClashSet {
    /// Create an empty clash set with the default tolerance
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tolerance: DEFAULT_TOLERANCE,
            a: Vec::new(),
            b: Vec::new(),
        }
    }

    /// Whether this set tests group "a" against itself
    pub fn is_internal(&self) -> bool {
        self.b.is_empty()
    }
}

/// Parse clash sets from a JSON string
pub fn clash_sets_from_json(json: &str) -> Result<Vec<ClashSet>> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize clash sets to pretty-printed JSON
pub fn clash_sets_to_json(clash_sets: &[ClashSet]) -> Result<String> {
    Ok(serde_json::to_string_pretty(clash_sets)?)
}

/// Load clash sets from a JSON file
pub fn load_clash_sets(path: impl AsRef<Path>) -> Result<Vec<ClashSet>> {
    clash_sets_from_json(&fs::read_to_string(path)?)
}

/// Save clash sets to a JSON file
pub fn save_clash_sets(path: impl AsRef<Path>, clash_sets: &[ClashSet]) -> Result<()> {
    fs::write(path, clash_sets_to_json(clash_sets)?)?;
    Ok(())
}
