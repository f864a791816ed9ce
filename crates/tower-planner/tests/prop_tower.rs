use proptest::prelude::*;
use tower_collision::separating_axis_test;
use tower_planner::{TowerGenParams, build_tower};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_seed_replays_and_keeps_blocks_apart(seed in any::<u64>(), count in 3usize..12) {
        let mut params = TowerGenParams::default();
        params.blocks.count = count;
        let first = build_tower(&params, seed);
        prop_assert_eq!(&first, &build_tower(&params, seed));
        if let Ok(blocks) = first {
            let boxes: Vec<_> = blocks.iter().map(|b| b.oriented_box().vertices()).collect();
            for i in 0..boxes.len() {
                for j in (i + 1)..boxes.len() {
                    prop_assert!(!separating_axis_test(&boxes[i], &boxes[j]));
                }
            }
            // stacked blocks never start below the ground plane
            prop_assert!(blocks.iter().all(|b| b.position.z >= params.rules.base_height));
        }
    }
}
