use proptest::prelude::*;
use proptest::strategy::Strategy;
use tower_collision::separating_axis_test;
use tower_geom::{Rotation, Vec3, box_vertices};

fn coord() -> impl Strategy<Value = f64> {
    -3.0..3.0f64
}

fn extent() -> impl Strategy<Value = f64> {
    0.1..2.0f64
}

fn angle() -> impl Strategy<Value = f64> {
    -std::f64::consts::PI..std::f64::consts::PI
}

fn arb_box() -> impl Strategy<Value = [Vec3; 8]> {
    (
        (coord(), coord(), coord()),
        (extent(), extent(), extent()),
        (angle(), angle(), angle()),
    )
        .prop_map(|((x, y, z), (l, w, h), (rx, ry, rz))| {
            box_vertices(Vec3::new(x, y, z), Vec3::new(l, w, h), Rotation::new(rx, ry, rz))
        })
}

fn arb_yawed_box() -> impl Strategy<Value = [Vec3; 8]> {
    ((coord(), coord(), coord()), (extent(), extent(), extent()), angle()).prop_map(
        |((x, y, z), (l, w, h), yaw)| {
            box_vertices(Vec3::new(x, y, z), Vec3::new(l, w, h), Rotation::yaw(yaw))
        },
    )
}

fn radius(v: &[Vec3; 8]) -> (Vec3, f64) {
    let c = v.iter().fold(Vec3::ZERO, |acc, p| acc + *p) / 8.0;
    let r = v.iter().map(|p| p.distance(c)).fold(0.0, f64::max);
    (c, r)
}

proptest! {
    #[test]
    fn sat_is_symmetric(a in arb_box(), b in arb_box()) {
        prop_assert_eq!(separating_axis_test(&a, &b), separating_axis_test(&b, &a));
    }

    #[test]
    fn sat_is_symmetric_for_yawed_boxes(a in arb_yawed_box(), b in arb_yawed_box()) {
        prop_assert_eq!(separating_axis_test(&a, &b), separating_axis_test(&b, &a));
    }

    // Boxes whose bounding spheres are disjoint never collide
    #[test]
    fn distant_boxes_never_collide(a in arb_box(), b in arb_box()) {
        let (ca, ra) = radius(&a);
        let (cb, rb) = radius(&b);
        prop_assume!(ca.distance(cb) > ra + rb + 0.05);
        prop_assert!(!separating_axis_test(&a, &b));
    }

    // A box always collides with itself and with a copy nudged by less than its half size
    #[test]
    fn box_collides_with_small_translate(a in arb_box(), t in (-0.04..0.04f64, -0.04..0.04f64, -0.04..0.04f64)) {
        let shifted = a.map(|v| v + Vec3::new(t.0, t.1, t.2));
        prop_assert!(separating_axis_test(&a, &a));
        prop_assert!(separating_axis_test(&a, &shifted));
    }
}
