use rand::Rng;
use tower_collision::check_against_set;
use tower_geom::{OrientedBox, Rotation, Vec3};
use tower_heightmap::Heightmap;

use crate::{BlockSet, NoPositionReason, PlacementError};

/// True when a block at `position` (base) would interpenetrate any committed block.
pub fn check_collision(existing: &BlockSet, position: Vec3, size: Vec3, rotation: Rotation) -> bool {
    let candidate = OrientedBox::from_base(position, size, rotation);
    check_against_set(existing.oriented_boxes(), &candidate)
}

/// Greedy randomized placement of one block.
///
/// Candidates come from the heightmap and are tried in random order without
/// replacement. The first one clear of `existing` is committed to the heightmap
/// and returned; the heightmap is untouched on failure.
pub fn place_block<R: Rng + ?Sized>(
    heightmap: &mut Heightmap,
    existing: &BlockSet,
    size: Vec3,
    rotation: Rotation,
    ground_level: bool,
    rng: &mut R,
) -> Result<Vec3, PlacementError> {
    let mut candidates = heightmap.valid_positions(size, ground_level, rng);
    if candidates.is_empty() {
        log::debug!("place: no candidates for size {size:?} (ground={ground_level})");
        return Err(PlacementError::NoValidPosition {
            reason: NoPositionReason::NoCandidates,
        });
    }
    let tried = candidates.len();
    while !candidates.is_empty() {
        let pick = rng.random_range(0..candidates.len());
        let position = candidates.swap_remove(pick);
        if check_collision(existing, position, size, rotation) {
            log::trace!("place: candidate {position:?} collides");
            continue;
        }
        let min_ratio = heightmap.rules().min_support_ratio;
        heightmap.update_height(position, size, rotation, min_ratio);
        return Ok(position);
    }
    log::debug!("place: all {tried} candidate(s) collide for size {size:?}");
    Err(PlacementError::NoValidPosition {
        reason: NoPositionReason::AllCandidatesCollide { tried },
    })
}
