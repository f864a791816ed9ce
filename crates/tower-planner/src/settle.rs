//! Reading the outcome of an external physics settle.

use serde::Serialize;
use tower_geom::Vec3;

use crate::{BlockId, BlockSet, TowerError};

/// Ground half the tower fell towards: `Red` for positive x, `Green` otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Green,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum SettleOutcome {
    Stands,
    Collapsed { displaced: Vec<BlockId>, direction: Side },
}

impl SettleOutcome {
    #[inline]
    pub fn stands(&self) -> bool {
        matches!(self, SettleOutcome::Stands)
    }
}

/// Compare planned block positions with where the physics left them.
///
/// `settled[i]` is the settled base position of block `i`. A block moved more
/// than `tolerance` counts as displaced; any displacement means collapse.
pub fn assess_settle(
    blocks: &BlockSet,
    settled: &[Vec3],
    tolerance: f64,
) -> Result<SettleOutcome, TowerError> {
    if blocks.len() != settled.len() {
        return Err(TowerError::SettleMismatch {
            blocks: blocks.len(),
            settled: settled.len(),
        });
    }
    let displaced: Vec<BlockId> = blocks
        .ids()
        .zip(blocks.iter().zip(settled))
        .filter(|(_, (b, s))| b.position.distance(**s) > tolerance)
        .map(|(id, _)| id)
        .collect();
    if displaced.is_empty() {
        return Ok(SettleOutcome::Stands);
    }
    let mean_x = settled.iter().map(|p| p.x).sum::<f64>() / settled.len() as f64;
    let direction = if mean_x > 0.0 { Side::Red } else { Side::Green };
    log::debug!(
        "settle: {} block(s) displaced, mean x {mean_x:.3} -> {direction:?}",
        displaced.len()
    );
    Ok(SettleOutcome::Collapsed {
        displaced,
        direction,
    })
}
