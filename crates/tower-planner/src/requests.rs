//! Per-tower block requests drawn from size and colour quotas.

use rand::Rng;
use tower_geom::{Rotation, Vec3};

use crate::{BlockParams, TowerError};

/// One block to place, in stacking order.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockRequest {
    pub size: Vec3,
    pub rotation: Rotation,
    pub ground_level: bool,
    pub color: String,
    pub material: String,
}

/// Draw uniformly among entries with remaining quota and consume one.
fn draw<T: Clone, R: Rng + ?Sized>(
    quotas: &mut [(T, usize)],
    what: &'static str,
    rng: &mut R,
) -> Result<T, TowerError> {
    let open: Vec<usize> = (0..quotas.len()).filter(|&i| quotas[i].1 > 0).collect();
    if open.is_empty() {
        return Err(TowerError::QuotaExhausted { what });
    }
    let i = open[rng.random_range(0..open.len())];
    quotas[i].1 -= 1;
    Ok(quotas[i].0.clone())
}

/// Requests for one tower: pedestals first (ground level, fixed size), then
/// stacked blocks whose size comes from the size quotas. Every block takes a
/// colour from the colour quotas and a yaw from the configured angles.
///
/// A pedestal also consumes one unit of a size quota with the same extents,
/// when there is one left.
pub fn plan_requests<R: Rng + ?Sized>(
    params: &BlockParams,
    rng: &mut R,
) -> Result<Vec<BlockRequest>, TowerError> {
    let mut sizes = params.sizes.clone();
    let mut colors = params.colors.clone();
    let pedestals = if params.pedestal_min <= params.pedestal_max {
        rng.random_range(params.pedestal_min..=params.pedestal_max)
    } else {
        params.pedestal_min
    }
    .min(params.count);

    let mut out = Vec::with_capacity(params.count);
    for i in 0..params.count {
        let ground_level = i < pedestals;
        let color = draw(&mut colors, "color", rng)?;
        let size = if ground_level {
            if let Some(q) = sizes
                .iter_mut()
                .find(|(s, n)| *s == params.pedestal_size && *n > 0)
            {
                q.1 -= 1;
            }
            params.pedestal_size
        } else {
            draw(&mut sizes, "size", rng)?
        };
        let yaw = match params.yaw_degrees.len() {
            0 => 0.0,
            n => params.yaw_degrees[rng.random_range(0..n)],
        };
        out.push(BlockRequest {
            size,
            rotation: Rotation::yaw_degrees(yaw),
            ground_level,
            color,
            material: params.material.clone(),
        });
    }
    log::debug!(
        "requests: {} block(s), {} pedestal(s)",
        out.len(),
        pedestals
    );
    Ok(out)
}
