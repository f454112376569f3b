// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry source trait for clash detection

use crate::types::{GlobalId, MeshData};
use std::sync::Arc;

/// Identity transform, column-major
pub const IDENTITY_TRANSFORM: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

/// One element's tessellated shape with its world placement
#[derive(Clone, Debug)]
pub struct ElementShape {
    /// Globally unique IFC identifier of the element
    pub global_id: GlobalId,
    /// Triangulated mesh in local space (shared via Arc)
    pub mesh: Arc<MeshData>,
    /// 4x4 world transformation matrix (column-major order)
    pub transform: [f64; 16],
}

impl ElementShape {
    /// Create a shape record
    pub fn new(global_id: impl Into<GlobalId>, mesh: Arc<MeshData>, transform: [f64; 16]) -> Self {
        Self {
            global_id: global_id.into(),
            mesh,
            transform,
        }
    }

    /// Create a shape placed at the world origin
    pub fn with_identity_transform(global_id: impl Into<GlobalId>, mesh: Arc<MeshData>) -> Self {
        Self::new(global_id, mesh, IDENTITY_TRANSFORM)
    }
}

/// Source of tessellated element shapes
///
/// Implemented by the mesh tessellation/import pipeline. The engine only
/// requires that global ids are unique within the set returned by one
/// `shapes` call; duplicate ids are rejected at registration time.
pub trait ShapeSource: Send + Sync {
    /// Produce the shapes of every element of interest, in a stable order
    fn shapes(&self) -> Vec<ElementShape>;
}

/// In-memory shape source, mainly for tests and small pipelines
#[derive(Clone, Debug, Default)]
pub struct StaticShapeSource {
    shapes: Vec<ElementShape>,
}

impl StaticShapeSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to the source
    pub fn push(&mut self, shape: ElementShape) {
        self.shapes.push(shape);
    }
}

impl ShapeSource for StaticShapeSource {
    fn shapes(&self) -> Vec<ElementShape> {
        self.shapes.clone()
    }
}
