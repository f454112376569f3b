// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Narrow-phase exact collision testing
//!
//! Runs the exact mesh-vs-mesh test for every broad-phase candidate pair
//! and reports contact data for confirmed collisions. Collision is decided
//! by descending both triangle hierarchies under their rigid placements;
//! no tolerance is applied here. Tolerance filtering belongs to the clash
//! session.
//!
//! Pairs are independent work items over read-only group data, so the
//! per-pair loop runs on the rayon pool. Results are collected in pair
//! order, keeping clash sequences reproducible, and a cooperative
//! cancellation token is checked at every pair.

use ifc_clash_model::GlobalId;
use nalgebra::{Point3, Vector3};
use parry3d_f64::query;
use rayon::prelude::*;

use crate::adapter::CollisionObject;
use crate::broad_phase::CandidatePair;
use crate::error::{Error, Result};
use crate::session::CancelToken;
use crate::spatial::Group;

/// Surface distance below which two meshes are considered touching
///
/// Guards against the exact boolean test missing exactly coincident
/// triangles; well inside any meaningful clash tolerance.
const TOUCH_EPSILON: f64 = 1.0e-9;

/// Contact data for a confirmed collision
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    /// World-space contact point
    pub point: Point3<f64>,
    /// World-space contact normal, pointing from the first solid into the second
    pub normal: Vector3<f64>,
    /// Overlap magnitude along the separating axis found by the exact test
    pub depth: f64,
}

/// A candidate pair confirmed as truly colliding
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionHit {
    /// Element from the first group
    pub a: GlobalId,
    /// Element from the second group
    pub b: GlobalId,
    /// Contact reported by the exact test
    pub contact: Contact,
}

/// Capability seam for exact collision primitives
///
/// Abstracts the hierarchy/intersection backend so the session does not
/// depend on a particular collision library's object model.
pub trait ContactSolver: Send + Sync {
    /// Exact test of two collision objects
    ///
    /// Returns `Some(contact)` only when the solids truly collide.
    fn test(&self, a: &CollisionObject, b: &CollisionObject) -> Result<Option<Contact>>;
}

/// Default solver backed by parry's triangle-mesh queries
///
/// Collision is decided by exact hierarchy-vs-hierarchy surface
/// intersection (with a distance query backstop for coincident surfaces).
/// Contact point, normal and penetration depth come from the EPA contact
/// between the convex hulls of the two meshes, which reports the full
/// overlap along the separating axis rather than a per-triangle sliver.
#[derive(Clone, Copy, Debug, Default)]
pub struct TriMeshSolver;

impl ContactSolver for TriMeshSolver {
    fn test(&self, a: &CollisionObject, b: &CollisionObject) -> Result<Option<Contact>> {
        let surfaces_intersect =
            query::intersection_test(a.position(), a.shape(), b.position(), b.shape())
                .map_err(|_| Error::geometry("unsupported shape pair in exact collision test"))?;
        let touching = surfaces_intersect || {
            let distance = query::distance(a.position(), a.shape(), b.position(), b.shape())
                .map_err(|_| Error::geometry("unsupported shape pair in distance query"))?;
            distance <= TOUCH_EPSILON
        };
        if !touching {
            return Ok(None);
        }
        Ok(Some(hull_contact(a, b)))
    }
}

/// Extract contact data for a pair already known to collide
///
/// EPA reports zero depth for exactly coincident or perfectly symmetric
/// placements even though the solids overlap fully; a non-positive depth
/// is therefore treated as degenerate and resolved through the box
/// overlap instead.
fn hull_contact(a: &CollisionObject, b: &CollisionObject) -> Contact {
    if let (Some(hull_a), Some(hull_b)) = (a.hull(), b.hull()) {
        if let Ok(Some(contact)) = query::contact(a.position(), hull_a, b.position(), hull_b, 0.0) {
            let depth = -contact.dist;
            if depth > 0.0 {
                return Contact {
                    point: nalgebra::center(&contact.point1, &contact.point2),
                    normal: contact.normal1.into_inner(),
                    depth,
                };
            }
        }
    }
    box_overlap_contact(a, b)
}

/// Contact derived from the overlap of the two world boxes
///
/// Fallback for pairs whose hull contact degenerates (or whose hulls
/// could not be built). Depth is the smallest axis extent of the box
/// intersection, the translation that would separate the boxes; for a
/// grazing touch that extent is zero.
fn box_overlap_contact(a: &CollisionObject, b: &CollisionObject) -> Contact {
    let box_a = a.world_aabb();
    let box_b = b.world_aabb();
    let mins = box_a.mins.coords.sup(&box_b.mins.coords);
    let maxs = box_a.maxs.coords.inf(&box_b.maxs.coords);
    let extents = maxs - mins;
    let mut axis = 0;
    for i in 1..3 {
        if extents[i] < extents[axis] {
            axis = i;
        }
    }
    let mut normal = Vector3::zeros();
    normal[axis] = if box_b.center()[axis] >= box_a.center()[axis] {
        1.0
    } else {
        -1.0
    };
    Contact {
        point: Point3::from((mins + maxs) * 0.5),
        normal,
        depth: extents[axis].max(0.0),
    }
}

/// Run the exact test over every candidate pair
///
/// Returns only the pairs that truly collide, in candidate order. Fails
/// with [`Error::Cancelled`] if the token fires; no partial result is
/// returned in that case.
pub fn narrow_phase(
    group_a: &Group,
    group_b: &Group,
    pairs: &[CandidatePair],
    solver: &dyn ContactSolver,
    cancel: &CancelToken,
) -> Result<Vec<CollisionHit>> {
    let hits: Vec<Option<CollisionHit>> = pairs
        .par_iter()
        .map(|pair| {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let (Some(object_a), Some(object_b)) =
                (group_a.object(&pair.a), group_b.object(&pair.b))
            else {
                return Ok(None);
            };
            Ok(solver.test(object_a, object_b)?.map(|contact| CollisionHit {
                a: pair.a.clone(),
                b: pair.b.clone(),
                contact,
            }))
        })
        .collect::<Result<_>>()?;
    Ok(hits.into_iter().flatten().collect())
}
