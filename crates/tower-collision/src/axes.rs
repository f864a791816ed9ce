//! Candidate separating axes for a pair of boxes.
//!
//! Axes are face normals of both boxes plus the cross products of their
//! edge directions. Every axis is identified by its components rounded to
//! three decimals with the sign fixed so the first non-zero rounded
//! component is positive; axes sharing a key are projected once.

use hashbrown::HashMap;
use tower_geom::{Vec3, box_faces, face_edges, face_normal};

/// Edge cross products of (unit) directions at or below this length are dropped.
pub const AXIS_EPS: f64 = 1e-3;

pub type AxisKey = (i64, i64, i64);

const KEY_SCALE: f64 = 1000.0;

/// Rounded, sign-canonical identity of a unit axis. `None` for zero or non-finite input.
pub fn axis_key(unit: Vec3) -> Option<AxisKey> {
    let k = [unit.x, unit.y, unit.z].map(|c| (c * KEY_SCALE).round());
    if k.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let lead = k.iter().copied().find(|c| *c != 0.0)?;
    let s = if lead < 0.0 { -1.0 } else { 1.0 };
    Some(((k[0] * s) as i64, (k[1] * s) as i64, (k[2] * s) as i64))
}

/// Unit axis keyed and oriented to match its [`axis_key`].
fn canonical(v: Vec3) -> Option<(AxisKey, Vec3)> {
    let len = v.length();
    if !(len > 0.0) || !len.is_finite() {
        return None;
    }
    let unit = v / len;
    let key = axis_key(unit)?;
    let lead = [unit.x, unit.y, unit.z]
        .into_iter()
        .find(|c| (c * KEY_SCALE).round() != 0.0)?;
    Some((key, if lead < 0.0 { -unit } else { unit }))
}

#[derive(Default)]
struct AxisSet {
    by_key: HashMap<AxisKey, Vec3>,
}

impl AxisSet {
    /// Keeps the lexicographically smallest representative per key, so the
    /// resulting set does not depend on insertion order.
    fn insert(&mut self, v: Vec3) {
        let Some((key, unit)) = canonical(v) else {
            return;
        };
        self.by_key
            .entry(key)
            .and_modify(|kept| {
                if lex_less(unit, *kept) {
                    *kept = unit;
                }
            })
            .or_insert(unit);
    }

    fn into_axes(self) -> Vec<Vec3> {
        let mut axes: Vec<(AxisKey, Vec3)> = self.by_key.into_iter().collect();
        axes.sort_by_key(|(k, _)| *k);
        axes.into_iter().map(|(_, v)| v).collect()
    }
}

#[inline]
fn lex_less(a: Vec3, b: Vec3) -> bool {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
        .is_lt()
}

/// Distinct edge directions of a box (at most three for a proper box).
fn edge_directions(vertices: &[Vec3; 8]) -> Vec<Vec3> {
    let mut dirs = AxisSet::default();
    for face in box_faces(vertices) {
        for e in face_edges(&face) {
            dirs.insert(e);
        }
    }
    dirs.into_axes()
}

/// All deduplicated candidate axes for boxes `a` and `b`, sorted by key.
pub fn separating_axes(a: &[Vec3; 8], b: &[Vec3; 8]) -> Vec<Vec3> {
    let mut set = AxisSet::default();
    for verts in [a, b] {
        for face in box_faces(verts) {
            if let Some(n) = face_normal(&face) {
                set.insert(n);
            }
        }
    }
    let edges_b = edge_directions(b);
    for ea in edge_directions(a) {
        for eb in &edges_b {
            let c = ea.cross(*eb);
            if c.length() > AXIS_EPS {
                set.insert(c);
            }
        }
    }
    set.into_axes()
}
