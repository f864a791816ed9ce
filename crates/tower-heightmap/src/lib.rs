//! Support-surface heightmap: accumulated block height and last support ratio per grid cell.
#![forbid(unsafe_code)]

mod grid;
mod rules;

pub use grid::{Cell, GridCoord, HeightUpdate, Heightmap};
pub use rules::SupportRules;
