// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for clash detection
//!
//! This module defines element identity and the neutral mesh representation
//! consumed by the clash engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe IFC global identifier
///
/// Wraps the 22-character IFC GUID string (e.g. `2O2Fr$t4X7Zf8NOew3FLOH`).
/// Elements are keyed by their global id within a clash group.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default)]
pub struct GlobalId(pub String);

impl GlobalId {
    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GlobalId {
    fn from(id: String) -> Self {
        GlobalId(id)
    }
}

impl From<&str> for GlobalId {
    fn from(id: &str) -> Self {
        GlobalId(id.to_string())
    }
}

/// Identity record for a solid under test
///
/// Carries the information needed to report which real-world objects
/// clashed. Immutable once registered with a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Globally unique IFC identifier
    pub global_id: GlobalId,
    /// IFC class name (e.g. "IFCWALL"), if known
    pub ifc_class: Option<String>,
    /// Human-readable element name, if known
    pub name: Option<String>,
}

impl ElementInfo {
    /// Create an identity record with only a global id
    pub fn new(global_id: impl Into<GlobalId>) -> Self {
        Self {
            global_id: global_id.into(),
            ifc_class: None,
            name: None,
        }
    }

    /// Attach the IFC class name
    pub fn with_class(mut self, ifc_class: impl Into<String>) -> Self {
        self.ifc_class = Some(ifc_class.into());
        self
    }

    /// Attach the element name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Triangulated mesh as flat buffers
///
/// The neutral interface between tessellation backends and the clash
/// engine: vertex coordinates as a flattened `[x, y, z, x, y, z, ...]`
/// sequence and triangles as index triplets into it. Coordinates are in
/// local mesh space; placement is carried separately as a world transform.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions as flattened [x, y, z, x, y, z, ...]
    pub positions: Vec<f64>,
    /// Triangle indices, three per triangle
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from existing flat buffers
    pub fn from_buffers(positions: Vec<f64>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
