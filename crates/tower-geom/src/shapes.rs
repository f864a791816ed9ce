//! Box vertices, faces and footprints.
//!
//! Two representations of the same block are derived here: the full 3D
//! vertex set used for interpenetration checks, and the 2D footprint used
//! for support bookkeeping. Both come from the same `(position, size,
//! rotation)` triple, so the footprint is always the XY projection of the
//! box's bottom face when the rotation is yaw-only.

use crate::{Rotation, Vec2, Vec3};

/// Cross products shorter than this are treated as degenerate.
const DEGENERATE_EPS: f64 = 1e-9;

/// Vertex indices of the six quads, in `box_vertices` order.
///
/// Vertex `i` has local signs `(+l if i < 4, +w if i % 4 < 2, +h if i is even)`.
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2], // +x
    [4, 5, 7, 6], // -x
    [0, 4, 6, 2], // top
    [1, 5, 7, 3], // bottom
    [0, 1, 5, 4], // +y
    [2, 3, 7, 6], // -y
];

/// The eight corners of a box of full extents `size` centred on `center`.
pub fn box_vertices(center: Vec3, size: Vec3, rotation: Rotation) -> [Vec3; 8] {
    let (hl, hw, hh) = (size.x / 2.0, size.y / 2.0, size.z / 2.0);
    let local = [
        Vec3::new(hl, hw, hh),
        Vec3::new(hl, hw, -hh),
        Vec3::new(hl, -hw, hh),
        Vec3::new(hl, -hw, -hh),
        Vec3::new(-hl, hw, hh),
        Vec3::new(-hl, hw, -hh),
        Vec3::new(-hl, -hw, hh),
        Vec3::new(-hl, -hw, -hh),
    ];
    local.map(|v| center + rotation.apply(v))
}

/// Faces of a box as vertex quads, using [`BOX_FACES`].
pub fn box_faces(vertices: &[Vec3; 8]) -> [[Vec3; 4]; 6] {
    BOX_FACES.map(|face| face.map(|i| vertices[i]))
}

/// Unit normal of the plane through the first three vertices of `face`.
///
/// Returns `None` when those vertices are (nearly) collinear.
pub fn face_normal(face: &[Vec3]) -> Option<Vec3> {
    if face.len() < 3 {
        return None;
    }
    let n = (face[1] - face[0]).cross(face[2] - face[0]);
    let len = n.length();
    if len <= DEGENERATE_EPS || !len.is_finite() {
        return None;
    }
    Some(n / len)
}

/// Edge vectors walking the face boundary, closing back to the first vertex.
pub fn face_edges(face: &[Vec3]) -> Vec<Vec3> {
    let n = face.len();
    (0..n).map(|i| face[(i + 1) % n] - face[i]).collect()
}

/// Corners of the rotated `length x width` base rectangle around `(center.x, center.y)`.
///
/// Only the yaw of `rotation` is used. Corners run `(+l,+w), (+l,-w), (-l,-w), (-l,+w)`.
pub fn footprint_polygon(center: Vec3, size: Vec3, rotation: Rotation) -> [Vec2; 4] {
    let (hl, hw) = (size.x / 2.0, size.y / 2.0);
    let origin = center.xy();
    [
        Vec2::new(hl, hw),
        Vec2::new(hl, -hw),
        Vec2::new(-hl, -hw),
        Vec2::new(-hl, hw),
    ]
    .map(|p| origin + rotation.apply_yaw(p))
}

/// A block volume for collision queries: centre, full extents and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    pub center: Vec3,
    pub size: Vec3,
    pub rotation: Rotation,
}

impl OrientedBox {
    #[inline]
    pub const fn new(center: Vec3, size: Vec3, rotation: Rotation) -> Self {
        Self {
            center,
            size,
            rotation,
        }
    }

    /// Box whose bottom face rests at `base.z`.
    #[inline]
    pub fn from_base(base: Vec3, size: Vec3, rotation: Rotation) -> Self {
        Self::new(base + Vec3::new(0.0, 0.0, size.z / 2.0), size, rotation)
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 8] {
        box_vertices(self.center, self.size, self.rotation)
    }

    #[inline]
    pub fn footprint(&self) -> [Vec2; 4] {
        footprint_polygon(self.center, self.size, self.rotation)
    }
}
