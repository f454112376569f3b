// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Clash Engine
//!
//! Spatial clash detection for building models: given groups of solids
//! extracted from IFC files, find the pairs that geometrically intersect
//! using a two-phase broad-phase/narrow-phase pipeline over
//! bounding-volume hierarchies.
//!
//! ## Pipeline
//!
//! - **Geometry adapter**: flat vertex/index buffers plus a 4x4 world
//!   transform become a [`CollisionObject`] (triangle BVH + rigid placement)
//! - **Spatial index**: per-group map from element id to its world box,
//!   answering inclusive box-overlap queries
//! - **Broad phase**: candidate pairs with overlapping boxes, each
//!   unordered pair emitted once
//! - **Narrow phase**: exact mesh-vs-mesh testing with contact point,
//!   normal and penetration depth
//! - **Session**: orchestrates groups, applies the minimum-penetration
//!   tolerance and aggregates results
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_clash_engine::ClashSession;
//! use ifc_clash_model::ElementInfo;
//!
//! let mut session = ClashSession::new();
//! session.create_group("structure");
//! session.create_group("services");
//! session.register_element("structure", ElementInfo::new(guid), &mesh, &transform)?;
//! // ... register services ...
//! let clashes = session.clash_between("structure", "services", 0.01)?;
//! ```

pub mod adapter;
pub mod broad_phase;
pub mod error;
pub mod narrow_phase;
pub mod session;
pub mod spatial;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export main types
pub use adapter::{build_collision_object, decompose_transform, CollisionObject};
pub use broad_phase::{broad_phase, CandidatePair};
pub use error::{Error, Result};
pub use narrow_phase::{narrow_phase, CollisionHit, Contact, ContactSolver, TriMeshSolver};
pub use session::{CancelToken, ClashSession};
pub use spatial::{boxes_overlap, Group, SpatialIndex};
