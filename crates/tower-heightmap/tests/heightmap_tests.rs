use rand::SeedableRng;
use rand::rngs::StdRng;
use tower_geom::{Rotation, Vec3};
use tower_heightmap::{GridCoord, Heightmap, SupportRules};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn surface() -> Heightmap {
    Heightmap::new(10.0, 10.0, 0.5)
}

#[test]
fn dimensions_follow_resolution() {
    let hm = surface();
    assert_eq!(hm.dims(), (20, 20));
    assert_eq!(hm.cells().count(), 400);
    assert!(hm.cells().all(|(_, c)| c.height == 0.0 && c.support == 0.0));
}

#[test]
fn world_to_grid_maps_origin_and_edges() {
    let hm = surface();
    assert_eq!(hm.world_to_grid(0.0, 0.0), Some(GridCoord::new(10, 10)));
    assert_eq!(hm.world_to_grid(-5.0, -5.0), Some(GridCoord::new(0, 0)));
    assert_eq!(hm.world_to_grid(5.0, 5.0), Some(GridCoord::new(19, 19)));
    assert_eq!(hm.world_to_grid(-0.01, 0.49), Some(GridCoord::new(9, 10)));
}

#[test]
fn points_off_the_surface_have_no_cell() {
    let hm = surface();
    assert_eq!(hm.world_to_grid(5.01, 0.0), None);
    assert_eq!(hm.world_to_grid(0.0, -5.01), None);
    assert_eq!(hm.world_to_grid(f64::NAN, 0.0), None);
    assert_eq!(hm.height_at(7.0, 7.0), None);
    assert_eq!(hm.support_at(-7.0, 0.0), None);
}

#[test]
fn grid_to_world_is_min_corner() {
    let hm = surface();
    let (x, y) = hm.grid_to_world(GridCoord::new(10, 9));
    assert!(approx(x, 0.0) && approx(y, -0.5));
    let (cx, cy) = hm.cell_center(GridCoord::new(10, 9));
    assert!(approx(cx, 0.25) && approx(cy, -0.25));
    assert_eq!(hm.world_to_grid(cx, cy), Some(GridCoord::new(10, 9)));
}

#[test]
fn offset_unit_footprint_raises_centre_and_edge_cells() {
    // [-0.25, 0.75]^2: one fully covered cell, four half-covered, four quarter-covered corners
    let mut hm = surface();
    let up = hm.update_height(
        Vec3::new(0.25, 0.25, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Rotation::IDENTITY,
        0.5,
    );
    assert_eq!(up.len(), 5);
    let mut raised: Vec<GridCoord> = up.raised.iter().map(|(c, _)| *c).collect();
    raised.sort();
    assert_eq!(
        raised,
        vec![
            GridCoord::new(9, 10),
            GridCoord::new(10, 9),
            GridCoord::new(10, 10),
            GridCoord::new(10, 11),
            GridCoord::new(11, 10),
        ]
    );
    for (c, ratio) in &up.raised {
        let expected = if *c == GridCoord::new(10, 10) { 1.0 } else { 0.5 };
        assert!(approx(*ratio, expected), "{c:?} ratio {ratio}");
        let cell = hm.cell(*c).unwrap();
        assert!(approx(cell.height, 1.0));
        assert!(approx(cell.support, expected));
    }
    assert_eq!(hm.height_at(-0.4, -0.4), Some(0.0));
}

#[test]
fn footprint_on_cell_corner_raises_four_full_cells() {
    let mut hm = surface();
    let up = hm.update_height(Vec3::ZERO, Vec3::new(1.0, 1.0, 2.0), Rotation::IDENTITY, 0.5);
    assert_eq!(up.len(), 4);
    assert!(up.raised.iter().all(|(_, r)| approx(*r, 1.0)));
    assert_eq!(hm.height_at(0.1, 0.1), Some(2.0));
    assert_eq!(hm.height_at(-0.1, -0.1), Some(2.0));
}

#[test]
fn heights_accumulate_and_support_is_last_write() {
    let mut hm = surface();
    let size = Vec3::new(1.0, 1.0, 1.5);
    hm.update_height(Vec3::ZERO, size, Rotation::IDENTITY, 0.5);
    hm.update_height(Vec3::new(0.25, 0.0, 1.5), size, Rotation::IDENTITY, 0.5);
    // cell [0, 0.5]^2 is fully covered twice
    assert!(approx(hm.height_at(0.2, 0.2).unwrap(), 3.0));
    // cell [-0.5, 0]^2 was full, then half covered
    assert!(approx(hm.height_at(-0.2, 0.2).unwrap(), 3.0));
    assert!(approx(hm.support_at(-0.2, 0.2).unwrap(), 0.5));
}

#[test]
fn rotated_footprint_uses_polygon_area() {
    let mut hm = surface();
    let up = hm.update_height(
        Vec3::new(0.25, 0.0, 0.0),
        Vec3::new(2.0, 0.5, 1.0),
        Rotation::yaw_degrees(90.0),
        0.5,
    );
    // a 0.5 x 2.0 strip along y over the column x in [0, 0.5]
    assert_eq!(up.len(), 4);
    assert!(up.raised.iter().all(|(c, _)| c.ix == 10));
}

#[test]
fn footprint_partly_off_the_surface_only_touches_grid_cells() {
    let mut hm = surface();
    let up = hm.update_height(
        Vec3::new(4.9, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Rotation::IDENTITY,
        0.5,
    );
    assert!(!up.is_empty());
    assert!(up.raised.iter().all(|(c, _)| c.ix < 20 && c.iy < 20));
    let off = hm.update_height(
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Rotation::IDENTITY,
        0.5,
    );
    assert!(off.is_empty());
}

#[test]
fn reset_clears_every_cell() {
    let mut hm = surface();
    hm.update_height(Vec3::ZERO, Vec3::new(3.0, 3.0, 1.0), Rotation::yaw(0.3), 0.5);
    assert!(hm.cells().any(|(_, c)| c.height > 0.0));
    hm.reset();
    assert!(hm.cells().all(|(_, c)| c.height == 0.0 && c.support == 0.0));
}

#[test]
fn ground_candidates_match_sample_count_and_base_height() {
    let hm = surface();
    let mut rng = StdRng::seed_from_u64(7);
    let c = hm.valid_positions(Vec3::new(0.5, 0.5, 1.5), true, &mut rng);
    assert_eq!(c.len(), 5);
    for p in &c {
        assert_eq!(p.z, 0.0);
        assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
    }
}

#[test]
fn ground_candidates_honour_configured_rules() {
    let rules = SupportRules {
        ground_samples: 12,
        ground_half_extent: 2.0,
        base_height: 0.25,
        ..SupportRules::default()
    };
    let hm = surface().with_rules(rules);
    let mut rng = StdRng::seed_from_u64(11);
    let c = hm.valid_positions(Vec3::new(0.5, 0.5, 1.5), true, &mut rng);
    assert_eq!(c.len(), 12);
    assert!(c.iter().all(|p| p.z == 0.25 && p.x.abs() <= 2.0 && p.y.abs() <= 2.0));
}

#[test]
fn small_surface_still_returns_every_ground_sample() {
    let hm = Heightmap::new(2.0, 2.0, 0.5);
    let size = Vec3::new(0.5, 0.5, 1.5);
    let reach = (0.5f64 * 0.5 + 0.5 * 0.5).sqrt() / 2.0;
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let c = hm.valid_positions(size, true, &mut rng);
        assert_eq!(c.len(), 5, "seed {seed}");
        for p in &c {
            assert_eq!(p.z, 0.0);
            assert!(p.x.abs() + reach <= 1.0 + 1e-9, "seed {seed}: {p:?}");
            assert!(p.y.abs() + reach <= 1.0 + 1e-9, "seed {seed}: {p:?}");
        }
    }
}

#[test]
fn block_wider_than_surface_samples_the_centre() {
    let hm = Heightmap::new(2.0, 2.0, 0.5);
    let mut rng = StdRng::seed_from_u64(2);
    let c = hm.valid_positions(Vec3::new(3.0, 3.0, 1.0), true, &mut rng);
    assert_eq!(c, vec![Vec3::new(0.0, 0.0, 0.0); 5]);
}

#[test]
fn non_finite_ground_extent_is_clamped_to_the_surface() {
    for extent in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let rules = SupportRules {
            ground_half_extent: extent,
            ..SupportRules::default()
        };
        let hm = surface().with_rules(rules);
        let mut rng = StdRng::seed_from_u64(4);
        let c = hm.valid_positions(Vec3::new(0.5, 0.5, 1.5), true, &mut rng);
        assert_eq!(c.len(), 5, "{extent}");
        assert!(c.iter().all(|p| p.x.is_finite() && p.y.is_finite()), "{extent}");
        assert!(c.iter().all(|p| p.x.abs() <= 5.0 && p.y.abs() <= 5.0), "{extent}");
    }
}

#[test]
fn uncovered_strip_has_no_cell() {
    // 4.9 / 0.5 leaves 9 cells covering [-2.45, 2.05]
    let hm = Heightmap::new(4.9, 4.9, 0.5);
    assert_eq!(hm.dims(), (9, 9));
    assert_eq!(hm.world_to_grid(2.45, 0.0), None);
    assert_eq!(hm.world_to_grid(0.0, 2.2), None);
    assert_eq!(hm.world_to_grid(2.05, 2.05), Some(GridCoord::new(8, 8)));
    assert_eq!(hm.world_to_grid(-2.45, -2.45), Some(GridCoord::new(0, 0)));
    for x in [-2.45, -1.0, 0.3, 1.99, 2.05] {
        let c = hm.world_to_grid(x, 0.0).unwrap();
        let (wx, _) = hm.grid_to_world(c);
        assert!(x - wx >= -1e-9 && x - wx <= 0.5 + 1e-9, "{x} -> {wx}");
    }
}

#[test]
fn empty_surface_has_no_stacked_candidates() {
    let hm = surface();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(hm.valid_positions(Vec3::new(0.5, 0.5, 0.5), false, &mut rng).is_empty());
}

#[test]
fn stacked_candidates_come_from_partially_supported_cells() {
    let mut hm = surface();
    hm.update_height(
        Vec3::new(0.25, 0.25, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Rotation::IDENTITY,
        0.5,
    );
    let mut rng = StdRng::seed_from_u64(3);
    let c = hm.valid_positions(Vec3::new(0.5, 0.5, 0.5), false, &mut rng);
    // the fully covered centre cell (ratio 1.0) is outside [0.5, 1.0)
    assert_eq!(c.len(), 4);
    for p in &c {
        assert!(approx(p.z, 1.0 + hm.rules().drop_clearance));
        let cell = hm.world_to_grid(p.x, p.y).unwrap();
        assert_ne!(cell, GridCoord::new(10, 10));
        assert!(hm.rules().in_band(hm.cell(cell).unwrap().support));
    }
}

#[test]
fn same_seed_gives_same_candidates() {
    let mut hm = surface();
    hm.update_height(
        Vec3::new(0.25, 0.25, 0.0),
        Vec3::new(1.5, 0.5, 0.5),
        Rotation::yaw(0.4),
        0.5,
    );
    let size = Vec3::new(0.5, 0.5, 0.5);
    for ground in [true, false] {
        let a = hm.valid_positions(size, ground, &mut StdRng::seed_from_u64(99));
        let b = hm.valid_positions(size, ground, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}

#[test]
fn dropped_block_leaves_cell_at_its_top() {
    let mut hm = surface();
    hm.update_height(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.5), Rotation::IDENTITY, 0.5);
    let clearance = hm.rules().drop_clearance;
    hm.update_height(
        Vec3::new(0.0, 0.0, 1.5 + clearance),
        Vec3::new(1.0, 1.0, 0.5),
        Rotation::IDENTITY,
        0.5,
    );
    assert!(approx(hm.height_at(0.2, 0.2).unwrap(), 2.0 + clearance));
}
