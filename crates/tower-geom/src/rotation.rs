use serde::{Deserialize, Serialize};

use crate::{Vec2, Vec3};

/// XYZ Euler angles in radians, applied X first, then Y, then Z (`R = Rz * Ry * Rx`).
///
/// Towers only ever use yaw (`z`); roll and pitch are accepted so block
/// records from other tools can be read unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn yaw(angle: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: angle,
        }
    }

    #[inline]
    pub fn yaw_degrees(deg: f64) -> Self {
        Self::yaw(deg.to_radians())
    }

    #[inline]
    pub fn is_yaw_only(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let (sx, cx) = self.x.sin_cos();
        let (sy, cy) = self.y.sin_cos();
        let (sz, cz) = self.z.sin_cos();
        // Rx
        let v = Vec3::new(v.x, v.y * cx - v.z * sx, v.y * sx + v.z * cx);
        // Ry
        let v = Vec3::new(v.x * cy + v.z * sy, v.y, -v.x * sy + v.z * cy);
        // Rz
        Vec3::new(v.x * cz - v.y * sz, v.x * sz + v.y * cz, v.z)
    }

    /// Rotate a ground-plane point about the vertical axis by the yaw component only.
    #[inline]
    pub fn apply_yaw(&self, p: Vec2) -> Vec2 {
        let (s, c) = self.z.sin_cos();
        Vec2::new(p.x * c - p.y * s, p.x * s + p.y * c)
    }
}

impl From<[f64; 3]> for Rotation {
    #[inline]
    fn from(v: [f64; 3]) -> Self {
        Rotation::new(v[0], v[1], v[2])
    }
}
