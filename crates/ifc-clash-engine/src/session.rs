// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clash session orchestration
//!
//! A session owns the groups of one clash run and composes the pipeline:
//! geometry adapter at registration, then broad phase, narrow phase and
//! tolerance filtering per query. Registration is write-once and strictly
//! precedes querying, so queries are idempotent and need no locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ifc_clash_model::{Clash, ClashSetResults, ElementInfo, GlobalId, MeshData, ShapeSource};

use crate::adapter::build_collision_object;
use crate::broad_phase::broad_phase;
use crate::error::{Error, Result};
use crate::narrow_phase::{narrow_phase, CollisionHit, ContactSolver, TriMeshSolver};
use crate::spatial::{Group, SpatialIndex};

/// Cooperative cancellation token
///
/// Cloned handles share one flag; the narrow phase checks it at every
/// processed pair, bounding abort latency on large models.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an un-fired token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the running query
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One clash detection session
///
/// Groups live for the duration of the session and are dropped with it.
pub struct ClashSession {
    index: SpatialIndex,
    solver: Box<dyn ContactSolver>,
    cancel: CancelToken,
}

impl Default for ClashSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClashSession {
    /// Create a session with the default triangle-mesh solver
    pub fn new() -> Self {
        Self::with_solver(Box::new(TriMeshSolver))
    }

    /// Create a session with a custom exact-collision backend
    pub fn with_solver(solver: Box<dyn ContactSolver>) -> Self {
        Self {
            index: SpatialIndex::new(),
            solver,
            cancel: CancelToken::new(),
        }
    }

    /// Get a handle that can cancel this session's running queries
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Create a group; a no-op if it already exists
    pub fn create_group(&mut self, name: &str) {
        self.index.create_group(name);
    }

    /// Look up a group by name
    pub fn group(&self, name: &str) -> Result<&Group> {
        self.index.group(name)
    }

    /// Register one element's geometry in a group
    pub fn register_element(
        &mut self,
        group: &str,
        info: ElementInfo,
        mesh: &MeshData,
        world_transform: &[f64; 16],
    ) -> Result<()> {
        let object = build_collision_object(mesh, world_transform)?;
        self.index.register(group, info, object)
    }

    /// Register every shape of a source, skipping degenerate geometry
    ///
    /// Geometry failures abort only the affected element and are returned
    /// with their ids so the caller can decide to report or halt.
    /// Duplicate ids and unknown groups indicate caller bugs and fail the
    /// whole call.
    pub fn register_source(
        &mut self,
        group: &str,
        source: &dyn ShapeSource,
    ) -> Result<Vec<(GlobalId, Error)>> {
        let mut skipped = Vec::new();
        for shape in source.shapes() {
            match build_collision_object(&shape.mesh, &shape.transform) {
                Ok(object) => {
                    let info = ElementInfo::new(shape.global_id);
                    self.index.register(group, info, object)?;
                }
                Err(err) => skipped.push((shape.global_id, err)),
            }
        }
        Ok(skipped)
    }

    /// Detect clashes within one group
    ///
    /// Contacts shallower than `min_depth` are discarded as noise.
    pub fn clash_internal(&self, group: &str, min_depth: f64) -> Result<Vec<CollisionHit>> {
        self.clash(group, group, min_depth)
    }

    /// Detect clashes between two groups
    pub fn clash_between(
        &self,
        group_a: &str,
        group_b: &str,
        min_depth: f64,
    ) -> Result<Vec<CollisionHit>> {
        self.clash(group_a, group_b, min_depth)
    }

    fn clash(&self, group_a: &str, group_b: &str, min_depth: f64) -> Result<Vec<CollisionHit>> {
        let a = self.index.group(group_a)?;
        let b = self.index.group(group_b)?;
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let pairs = broad_phase(a, b);
        let hits = narrow_phase(a, b, &pairs, self.solver.as_ref(), &self.cancel)?;
        Ok(hits
            .into_iter()
            .filter(|hit| hit.contact.depth >= min_depth)
            .collect())
    }

    /// Execute one named clash set over two registered groups
    ///
    /// Runs a self-collision query when both names are equal, and maps the
    /// hits into the keyed result records consumed by the report layer.
    pub fn run_clash_set(
        &self,
        name: &str,
        group_a: &str,
        group_b: &str,
        tolerance: f64,
    ) -> Result<ClashSetResults> {
        let hits = self.clash(group_a, group_b, tolerance)?;
        let mut results = ClashSetResults::new(name);
        for hit in hits {
            results.insert(Clash {
                a_global_id: hit.a,
                b_global_id: hit.b,
                contact_point: hit.contact.point.coords.into(),
                contact_normal: hit.contact.normal.into(),
                penetration_depth: hit.contact.depth,
            });
        }
        Ok(results)
    }
}
