// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared test fixtures

use ifc_clash_model::MeshData;

/// Axis-aligned unit cube spanning [0, 1] on every axis, 12 triangles
pub fn unit_cube() -> MeshData {
    cube_mesh(0.0, 1.0)
}

/// Axis-aligned unit cube spanning [-0.5, 0.5] on every axis
pub fn centered_cube() -> MeshData {
    cube_mesh(-0.5, 0.5)
}

fn cube_mesh(lo: f64, hi: f64) -> MeshData {
    #[rustfmt::skip]
    let positions = vec![
        lo, lo, lo,
        hi, lo, lo,
        hi, hi, lo,
        lo, hi, lo,
        lo, lo, hi,
        hi, lo, hi,
        hi, hi, hi,
        lo, hi, hi,
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        2, 3, 7, 2, 7, 6, // back
        3, 0, 4, 3, 4, 7, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    MeshData::from_buffers(positions, indices)
}

/// Pure translation as a column-major 4x4 transform
pub fn translation(x: f64, y: f64, z: f64) -> [f64; 16] {
    [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, x, y, z, 1.0,
    ]
}

/// Rotation about z followed by a translation, column-major
pub fn rotation_z_then_translation(angle: f64, x: f64, y: f64, z: f64) -> [f64; 16] {
    let (sin, cos) = angle.sin_cos();
    [
        cos, sin, 0.0, 0.0, -sin, cos, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, x, y, z, 1.0,
    ]
}
