//! Oriented-box interpenetration checks (Separating Axis Theorem).
#![forbid(unsafe_code)]

pub mod axes;

use tower_geom::{OrientedBox, Vec3};

pub use axes::{AXIS_EPS, AxisKey, axis_key, separating_axes};

/// How intervals that share only an endpoint are classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContactPolicy {
    /// `max_a == min_b` counts as overlap: boxes sharing a face collide.
    #[default]
    TouchingCollides,
    /// Only strict overlap counts: boxes sharing a face are separate.
    TouchingSeparates,
}

impl ContactPolicy {
    #[inline]
    pub fn overlaps(self, a: (f64, f64), b: (f64, f64)) -> bool {
        let ((min_a, max_a), (min_b, max_b)) = (a, b);
        match self {
            ContactPolicy::TouchingCollides => max_a >= min_b && max_b >= min_a,
            ContactPolicy::TouchingSeparates => max_a > min_b && max_b > min_a,
        }
    }
}

/// `(min, max)` of the vertices' dot products with `axis`.
pub fn project_vertices(vertices: &[Vec3], axis: Vec3) -> (f64, f64) {
    vertices
        .iter()
        .map(|v| v.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

/// True when the two boxes interpenetrate (touching counts, see [`ContactPolicy`]).
pub fn separating_axis_test(a: &[Vec3; 8], b: &[Vec3; 8]) -> bool {
    separating_axis_test_with(a, b, ContactPolicy::default())
}

/// SAT with an explicit contact policy. Returns `false` as soon as one axis
/// separates the projections.
pub fn separating_axis_test_with(a: &[Vec3; 8], b: &[Vec3; 8], policy: ContactPolicy) -> bool {
    separating_axes(a, b).into_iter().all(|axis| {
        let pa = project_vertices(a, axis);
        let pb = project_vertices(b, axis);
        policy.overlaps(pa, pb)
    })
}

/// Index of the first box in `existing` that the candidate interpenetrates.
pub fn first_collision<I>(existing: I, candidate: &OrientedBox, policy: ContactPolicy) -> Option<usize>
where
    I: IntoIterator<Item = OrientedBox>,
{
    let verts = candidate.vertices();
    existing
        .into_iter()
        .position(|other| separating_axis_test_with(&verts, &other.vertices(), policy))
}

/// True when the candidate interpenetrates any box in `existing`.
pub fn check_against_set<I>(existing: I, candidate: &OrientedBox) -> bool
where
    I: IntoIterator<Item = OrientedBox>,
{
    first_collision(existing, candidate, ContactPolicy::default()).is_some()
}
