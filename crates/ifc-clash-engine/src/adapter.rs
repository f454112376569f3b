// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry adapter
//!
//! Converts a flat-buffer triangle mesh plus a 4x4 world transform into a
//! [`CollisionObject`]: a bounding-volume hierarchy over the triangles in
//! local space and the rigid placement decomposed from the transform.
//! World positions are never baked into the hierarchy; the placement is
//! applied at query time, so the same local geometry could be reused under
//! a different placement.

use ifc_clash_model::MeshData;
use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion};
use std::fmt;
use parry3d_f64::bounding_volume::Aabb;
use parry3d_f64::shape::{ConvexPolyhedron, Shape, TriMesh};

use crate::error::{Error, Result};

/// Determinant magnitude below which a transform is treated as singular
const SINGULARITY_EPSILON: f64 = 1.0e-12;

/// A solid prepared for collision queries
///
/// Owns the triangle hierarchy in local mesh space, the convex hull used
/// for contact extraction (absent for degenerate flat meshes), the rigid
/// world placement, and the world-space box derived once for broad-phase
/// filtering. Immutable after construction.
pub struct CollisionObject {
    mesh: TriMesh,
    hull: Option<ConvexPolyhedron>,
    position: Isometry3<f64>,
    world_aabb: Aabb,
}

impl CollisionObject {
    /// Triangle hierarchy in local mesh space
    pub fn shape(&self) -> &TriMesh {
        &self.mesh
    }

    /// Convex hull of the mesh vertices, if one could be built
    pub fn hull(&self) -> Option<&ConvexPolyhedron> {
        self.hull.as_ref()
    }

    /// Rigid world placement (rotation + translation)
    pub fn position(&self) -> &Isometry3<f64> {
        &self.position
    }

    /// World-space axis-aligned bounding box
    pub fn world_aabb(&self) -> &Aabb {
        &self.world_aabb
    }

    /// Number of triangles in the hierarchy
    pub fn triangle_count(&self) -> usize {
        self.mesh.indices().len()
    }
}

// Summarised by hand; the triangle hierarchy itself has no Debug impl.
impl fmt::Debug for CollisionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionObject")
            .field("triangles", &self.triangle_count())
            .field("position", &self.position)
            .field("world_aabb", &self.world_aabb)
            .finish_non_exhaustive()
    }
}

/// Build a collision object from a mesh and its world transform
///
/// The transform is expected in column-major order, mapping local mesh
/// space to world space. Fails with [`Error::Geometry`] if the mesh has no
/// triangles, an index points past the vertex buffer, or the transform is
/// singular.
pub fn build_collision_object(
    mesh: &MeshData,
    world_transform: &[f64; 16],
) -> Result<CollisionObject> {
    if mesh.triangle_count() == 0 {
        return Err(Error::geometry("mesh has no triangles"));
    }
    if mesh.positions.len() % 3 != 0 {
        return Err(Error::geometry(format!(
            "vertex buffer length {} is not a multiple of 3",
            mesh.positions.len()
        )));
    }
    if mesh.indices.len() % 3 != 0 {
        return Err(Error::geometry(format!(
            "index buffer length {} is not a multiple of 3",
            mesh.indices.len()
        )));
    }
    let vertex_count = mesh.vertex_count() as u32;
    if let Some(&bad) = mesh.indices.iter().find(|&&i| i >= vertex_count) {
        return Err(Error::geometry(format!(
            "triangle index {bad} out of range for {vertex_count} vertices"
        )));
    }

    let vertices: Vec<Point3<f64>> = mesh
        .positions
        .chunks_exact(3)
        .map(|v| Point3::new(v[0], v[1], v[2]))
        .collect();
    let triangles: Vec<[u32; 3]> = mesh
        .indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect();

    let position = decompose_transform(world_transform)?;
    let hull = ConvexPolyhedron::from_convex_hull(&vertices);
    // Buffer validation above guarantees the hierarchy can be built.
    let trimesh = TriMesh::new(vertices, triangles);
    let world_aabb = trimesh.compute_aabb(&position);

    Ok(CollisionObject {
        mesh: trimesh,
        hull,
        position,
        world_aabb,
    })
}

/// Extract the rigid placement from a 4x4 column-major world transform
///
/// The linear part is reduced to its nearest rotation; IFC placements are
/// rigid, so any residual scale comes from unit conversion upstream and is
/// expected to be baked into the vertices already. Fails if the linear
/// part is singular.
pub fn decompose_transform(world_transform: &[f64; 16]) -> Result<Isometry3<f64>> {
    let matrix = Matrix4::from_column_slice(world_transform);
    let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let det = linear.determinant();
    if det.abs() < SINGULARITY_EPSILON {
        return Err(Error::geometry(format!(
            "singular world transform (determinant {det:e})"
        )));
    }
    let rotation = UnitQuaternion::from_matrix(&linear);
    let translation = Translation3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
    Ok(Isometry3::from_parts(translation, rotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{translation, unit_cube};
    use approx::assert_abs_diff_eq;
    use ifc_clash_model::IDENTITY_TRANSFORM;

    #[test]
    fn test_empty_mesh_rejected() {
        let mesh = MeshData::new();
        let err = build_collision_object(&mesh, &IDENTITY_TRANSFORM).unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mesh = MeshData::from_buffers(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 7],
        );
        let err = build_collision_object(&mesh, &IDENTITY_TRANSFORM).unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));
    }

    #[test]
    fn test_singular_transform_rejected() {
        // Zero scale on the z axis collapses the mesh to a plane.
        let mut transform = IDENTITY_TRANSFORM;
        transform[10] = 0.0;
        let err = build_collision_object(&unit_cube(), &transform).unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));
    }

    #[test]
    fn test_world_aabb_follows_translation() {
        let object = build_collision_object(&unit_cube(), &translation(10.0, 0.0, -2.0)).unwrap();
        assert_abs_diff_eq!(object.world_aabb().mins.x, 10.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(object.world_aabb().maxs.x, 11.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(object.world_aabb().mins.z, -2.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(object.world_aabb().maxs.z, -1.0, epsilon = 1.0e-9);
        assert_eq!(object.triangle_count(), 12);
        assert!(object.hull().is_some());
    }

    #[test]
    fn test_collision_object_debug_summarises_shape() {
        let object = build_collision_object(&unit_cube(), &IDENTITY_TRANSFORM).unwrap();
        let repr = format!("{object:?}");
        assert!(repr.contains("CollisionObject"));
        assert!(repr.contains("triangles: 12"));
    }

    #[test]
    fn test_placement_is_not_baked_into_local_mesh() {
        let object = build_collision_object(&unit_cube(), &translation(5.0, 5.0, 5.0)).unwrap();
        // Local hierarchy stays at the origin; only the placement moves.
        let local = object.shape().compute_aabb(&Isometry3::identity());
        assert_abs_diff_eq!(local.mins.x, 0.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(local.maxs.x, 1.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(object.position().translation.x, 5.0, epsilon = 1.0e-9);
    }
}
