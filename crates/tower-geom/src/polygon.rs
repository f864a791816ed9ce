//! Planar polygon helpers for support-area bookkeeping.

use crate::Vec2;

/// Absolute area of a simple polygon (shoelace formula).
pub fn polygon_area(points: &[Vec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n).map(|i| points[i].perp_dot(points[(i + 1) % n])).sum();
    twice.abs() / 2.0
}

/// Axis-aligned bounds `(min, max)` of a point set, or `None` when empty.
pub fn polygon_bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(points.iter().skip(1).fold((first, first), |(lo, hi), p| {
        (
            Vec2::new(lo.x.min(p.x), lo.y.min(p.y)),
            Vec2::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

#[derive(Clone, Copy)]
enum Edge {
    Left(f64),
    Right(f64),
    Bottom(f64),
    Top(f64),
}

impl Edge {
    #[inline]
    fn inside(self, p: Vec2) -> bool {
        match self {
            Edge::Left(x) => p.x >= x,
            Edge::Right(x) => p.x <= x,
            Edge::Bottom(y) => p.y >= y,
            Edge::Top(y) => p.y <= y,
        }
    }

    #[inline]
    fn intersect(self, a: Vec2, b: Vec2) -> Vec2 {
        let d = b - a;
        match self {
            Edge::Left(x) | Edge::Right(x) => {
                let t = (x - a.x) / d.x;
                Vec2::new(x, a.y + d.y * t)
            }
            Edge::Bottom(y) | Edge::Top(y) => {
                let t = (y - a.y) / d.y;
                Vec2::new(a.x + d.x * t, y)
            }
        }
    }
}

/// Clip a convex polygon to the rectangle `[min, max]` (Sutherland-Hodgman).
///
/// The result may be empty or degenerate; its [`polygon_area`] is the
/// intersection area either way.
pub fn clip_to_rect(polygon: &[Vec2], min: Vec2, max: Vec2) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = polygon.to_vec();
    for edge in [
        Edge::Left(min.x),
        Edge::Right(max.x),
        Edge::Bottom(min.y),
        Edge::Top(max.y),
    ] {
        if out.is_empty() {
            break;
        }
        let input = std::mem::take(&mut out);
        let n = input.len();
        for i in 0..n {
            let cur = input[i];
            let prev = input[(i + n - 1) % n];
            match (edge.inside(prev), edge.inside(cur)) {
                (true, true) => out.push(cur),
                (true, false) => out.push(edge.intersect(prev, cur)),
                (false, true) => {
                    out.push(edge.intersect(prev, cur));
                    out.push(cur);
                }
                (false, false) => {}
            }
        }
    }
    out
}
