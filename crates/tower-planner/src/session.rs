use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tower_heightmap::Heightmap;

use tower_geom::Vec3;

use crate::{
    BlockRequest, BlockSet, SettleOutcome, TowerError, TowerGenParams, assess_settle, place_block,
    plan_requests,
};

/// State of one tower being built: its surface and the committed blocks.
///
/// Sessions are independent; building several towers at once means one
/// session per tower.
#[derive(Clone, Debug)]
pub struct TowerSession {
    heightmap: Heightmap,
    blocks: BlockSet,
    max_attempts: usize,
    settle_tolerance: f64,
}

impl TowerSession {
    pub fn new(params: &TowerGenParams) -> Self {
        let heightmap = Heightmap::new(params.width, params.depth, params.resolution)
            .with_rules(params.rules.clone());
        Self {
            heightmap,
            blocks: BlockSet::new(),
            max_attempts: params.max_attempts.max(1),
            settle_tolerance: params.settle_tolerance,
        }
    }

    #[inline]
    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }

    #[inline]
    pub fn blocks(&self) -> &BlockSet {
        &self.blocks
    }

    pub fn into_blocks(self) -> BlockSet {
        self.blocks
    }

    /// Compare the committed blocks with their positions after a physics
    /// settle, using the session's configured tolerance.
    pub fn assess_settle(&self, settled: &[Vec3]) -> Result<SettleOutcome, TowerError> {
        assess_settle(&self.blocks, settled, self.settle_tolerance)
    }

    /// Clear the surface and the committed blocks.
    pub fn reset(&mut self) {
        self.heightmap.reset();
        self.blocks.clear();
    }

    /// Place every request in order, retrying each one up to `max_attempts`
    /// times. Stops at the first block that cannot be placed; blocks committed
    /// before it stay in the session.
    pub fn build<R: Rng + ?Sized>(
        &mut self,
        requests: &[BlockRequest],
        rng: &mut R,
    ) -> Result<(), TowerError> {
        for req in requests {
            let index = self.blocks.len();
            let mut placed = None;
            for attempt in 1..=self.max_attempts {
                match place_block(
                    &mut self.heightmap,
                    &self.blocks,
                    req.size,
                    req.rotation,
                    req.ground_level,
                    rng,
                ) {
                    Ok(pos) => {
                        placed = Some((pos, attempt));
                        break;
                    }
                    Err(e) => log::trace!("block {index} attempt {attempt}: {e}"),
                }
            }
            let Some((position, attempts)) = placed else {
                return Err(TowerError::BlockUnplaceable {
                    index,
                    attempts: self.max_attempts,
                });
            };
            if attempts > 1 {
                log::warn!("block {index} placed after {attempts} attempts");
            }
            self.blocks.push(
                req.size,
                position,
                req.rotation,
                req.color.as_str(),
                req.material.as_str(),
            );
            log::debug!(
                "block {index} committed at ({:.3}, {:.3}, {:.3})",
                position.x,
                position.y,
                position.z
            );
        }
        Ok(())
    }
}

/// Plan and build one tower from a seed.
pub fn build_tower(params: &TowerGenParams, seed: u64) -> Result<BlockSet, TowerError> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let requests = plan_requests(&params.blocks, &mut rng)?;
    let mut session = TowerSession::new(params);
    session.build(&requests, &mut rng)?;
    log::info!("tower {seed}: {} block(s) placed", session.blocks().len());
    Ok(session.into_blocks())
}
