// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index over named element groups
//!
//! Each group maps element ids to identity records and collision objects,
//! and keeps a bounding-volume tree over the world boxes derived at
//! registration, so a box query visits only the elements near the query
//! box instead of scanning the whole group. Registration is write-once;
//! the `elements` and `objects` maps always hold the same key set. Box
//! queries are answered in registration order so that clash results are
//! reproducible across runs.

use ifc_clash_model::{ElementInfo, GlobalId};
use parry3d_f64::bounding_volume::Aabb;
use parry3d_f64::partitioning::{Qbvh, QbvhUpdateWorkspace};
use rustc_hash::FxHashMap;

use crate::adapter::CollisionObject;
use crate::error::{Error, Result};

/// Inclusive axis-aligned box overlap test
///
/// Touching boxes count as overlapping. This is a deliberate conservative
/// bias: a boundary-adjacent pair must survive the broad phase, since the
/// narrow phase is the stage that rejects false positives.
pub fn boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.mins.x <= b.maxs.x
        && b.mins.x <= a.maxs.x
        && a.mins.y <= b.maxs.y
        && b.mins.y <= a.maxs.y
        && a.mins.z <= b.maxs.z
        && b.mins.z <= a.maxs.z
}

/// A named collection of solids under test
///
/// Lives for the duration of one clash session.
pub struct Group {
    name: String,
    /// Element ids in registration order
    order: Vec<GlobalId>,
    /// World boxes in registration order, the tree's leaf payloads
    boxes: Vec<Aabb>,
    elements: FxHashMap<GlobalId, ElementInfo>,
    objects: FxHashMap<GlobalId, CollisionObject>,
    /// Bounding-volume tree over `boxes`, leaves carry the element's
    /// registration index
    tree: Qbvh<u32>,
    workspace: QbvhUpdateWorkspace,
}

impl Group {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: Vec::new(),
            boxes: Vec::new(),
            elements: FxHashMap::default(),
            objects: FxHashMap::default(),
            tree: Qbvh::new(),
            workspace: QbvhUpdateWorkspace::default(),
        }
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered elements
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the group has no elements
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check whether an element id is registered
    pub fn contains(&self, id: &GlobalId) -> bool {
        self.elements.contains_key(id)
    }

    /// Get the identity record of an element
    pub fn element(&self, id: &GlobalId) -> Option<&ElementInfo> {
        self.elements.get(id)
    }

    /// Get the collision object of an element
    pub fn object(&self, id: &GlobalId) -> Option<&CollisionObject> {
        self.objects.get(id)
    }

    /// Iterate element ids in registration order
    pub fn iter(&self) -> impl Iterator<Item = &GlobalId> {
        self.order.iter()
    }

    /// Register an element (write-once)
    ///
    /// Fails with [`Error::DuplicateElement`] if the id already exists,
    /// leaving the group untouched.
    pub(crate) fn register(&mut self, info: ElementInfo, object: CollisionObject) -> Result<()> {
        let id = info.global_id.clone();
        if self.elements.contains_key(&id) {
            return Err(Error::duplicate_element(&self.name, id));
        }
        let leaf = self.order.len() as u32;
        self.boxes.push(*object.world_aabb());
        self.order.push(id.clone());
        self.objects.insert(id.clone(), object);
        self.elements.insert(id, info);
        // Incremental insertion; the tree stays queryable after every
        // registration without a full rebuild.
        self.tree.pre_update_or_insert(leaf);
        let boxes = &self.boxes;
        self.tree
            .refit(0.0, &mut self.workspace, |leaf| boxes[*leaf as usize]);
        Ok(())
    }

    /// Ids of all elements whose bounding box overlaps the query box
    ///
    /// The tree prunes far-away elements; [`boxes_overlap`] then decides
    /// each surviving leaf exactly. Results come back in registration
    /// order; an empty group yields an empty result.
    pub fn query_box(&self, query: &Aabb) -> Vec<GlobalId> {
        let mut leaves: Vec<u32> = Vec::new();
        self.tree.intersect_aabb(query, &mut leaves);
        // Leaf payloads are registration indices, so sorting restores
        // registration order.
        leaves.sort_unstable();
        leaves
            .into_iter()
            .filter(|&leaf| boxes_overlap(&self.boxes[leaf as usize], query))
            .filter_map(|leaf| self.order.get(leaf as usize).cloned())
            .collect()
    }
}

/// Named groups of one clash session
///
/// An explicit session-owned structure rather than process-wide state, so
/// independent sessions can run concurrently without interference.
#[derive(Default)]
pub struct SpatialIndex {
    groups: FxHashMap<String, Group>,
}

impl SpatialIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group; a no-op if the group already exists
    pub fn create_group(&mut self, name: &str) {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| Group::new(name));
    }

    /// Look up a group by name
    pub fn group(&self, name: &str) -> Result<&Group> {
        self.groups
            .get(name)
            .ok_or_else(|| Error::unknown_group(name))
    }

    /// Register an element in a named group
    pub fn register(
        &mut self,
        group: &str,
        info: ElementInfo,
        object: CollisionObject,
    ) -> Result<()> {
        self.groups
            .get_mut(group)
            .ok_or_else(|| Error::unknown_group(group))?
            .register(info, object)
    }

    /// Query a named group with a world-space box
    pub fn query_box(&self, group: &str, query: &Aabb) -> Result<Vec<GlobalId>> {
        Ok(self.group(group)?.query_box(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::build_collision_object;
    use crate::fixtures::{translation, unit_cube};

    fn index_with(elements: &[(&str, [f64; 3])]) -> SpatialIndex {
        let mut index = SpatialIndex::new();
        index.create_group("g");
        for (id, [x, y, z]) in elements {
            let object = build_collision_object(&unit_cube(), &translation(*x, *y, *z)).unwrap();
            index
                .register("g", ElementInfo::new(*id), object)
                .unwrap();
        }
        index
    }

    #[test]
    fn test_query_own_box_is_reflexive() {
        let index = index_with(&[("a", [0.0, 0.0, 0.0]), ("b", [5.0, 0.0, 0.0])]);
        let group = index.group("g").unwrap();
        for id in group.iter() {
            let own_box = group.object(id).unwrap().world_aabb();
            let hits = group.query_box(own_box);
            assert!(hits.contains(id), "element {id} missing from its own box");
        }
    }

    #[test]
    fn test_touching_boxes_count_as_overlapping() {
        // Cubes [0,1] and [1,2] on x share exactly one face.
        let index = index_with(&[("a", [0.0, 0.0, 0.0]), ("b", [1.0, 0.0, 0.0])]);
        let group = index.group("g").unwrap();
        let a_box = group.object(&GlobalId::from("a")).unwrap().world_aabb();
        let hits = group.query_box(a_box);
        assert_eq!(hits, vec![GlobalId::from("a"), GlobalId::from("b")]);
    }

    #[test]
    fn test_empty_group_yields_empty_result() {
        let mut index = SpatialIndex::new();
        index.create_group("empty");
        let cursor = build_collision_object(&unit_cube(), &translation(0.0, 0.0, 0.0)).unwrap();
        let hits = index.query_box("empty", cursor.world_aabb()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_unknown_group_is_an_error() {
        let index = SpatialIndex::new();
        let cursor = build_collision_object(&unit_cube(), &translation(0.0, 0.0, 0.0)).unwrap();
        let err = index.query_box("nope", cursor.world_aabb()).unwrap_err();
        assert!(matches!(err, Error::UnknownGroup(name) if name == "nope"));
    }

    #[test]
    fn test_duplicate_registration_leaves_group_unchanged() {
        let mut index = index_with(&[("a", [0.0, 0.0, 0.0])]);
        let replacement =
            build_collision_object(&unit_cube(), &translation(100.0, 0.0, 0.0)).unwrap();
        let err = index
            .register("g", ElementInfo::new("a"), replacement)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateElement { .. }));

        let group = index.group("g").unwrap();
        assert_eq!(group.len(), 1);
        // The original object is still in place.
        let aabb = group.object(&GlobalId::from("a")).unwrap().world_aabb();
        assert!(aabb.mins.x.abs() < 1.0e-9);
    }

    #[test]
    fn test_query_results_follow_registration_order() {
        let index = index_with(&[
            ("c", [0.2, 0.0, 0.0]),
            ("a", [0.0, 0.0, 0.0]),
            ("b", [0.1, 0.0, 0.0]),
        ]);
        let group = index.group("g").unwrap();
        let cursor = build_collision_object(&unit_cube(), &translation(0.0, 0.0, 0.0)).unwrap();
        let hits = group.query_box(cursor.world_aabb());
        assert_eq!(
            hits,
            vec![GlobalId::from("c"), GlobalId::from("a"), GlobalId::from("b")]
        );
    }

    #[test]
    fn test_query_over_scattered_elements_returns_only_neighbours() {
        // A row of well separated cubes; a query around one of them must
        // return exactly that cube and its touching neighbours.
        let mut index = SpatialIndex::new();
        index.create_group("g");
        for i in 0..32 {
            let object =
                build_collision_object(&unit_cube(), &translation(2.0 * i as f64, 0.0, 0.0))
                    .unwrap();
            index
                .register("g", ElementInfo::new(format!("e{i}")), object)
                .unwrap();
        }
        let group = index.group("g").unwrap();
        let cursor = build_collision_object(&unit_cube(), &translation(20.0, 0.0, 0.0)).unwrap();
        let hits = group.query_box(cursor.world_aabb());
        assert_eq!(hits, vec![GlobalId::from("e10")]);

        // A wider box spanning three cubes picks them up in registration
        // order.
        let wide = Aabb::new(
            nalgebra::Point3::new(17.5, 0.0, 0.0),
            nalgebra::Point3::new(22.5, 1.0, 1.0),
        );
        let hits = group.query_box(&wide);
        assert_eq!(
            hits,
            vec![
                GlobalId::from("e9"),
                GlobalId::from("e10"),
                GlobalId::from("e11")
            ]
        );
    }
}
