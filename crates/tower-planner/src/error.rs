use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoPositionReason {
    /// The heightmap produced no candidate for the requested size and mode.
    NoCandidates,
    /// Every candidate interpenetrated an already committed block.
    AllCandidatesCollide { tried: usize },
}

/// A single `place_block` call that could not commit the block.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no valid position: {reason}")]
    NoValidPosition { reason: NoPositionReason },
}

impl fmt::Display for NoPositionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoPositionReason::NoCandidates => f.write_str("no candidates"),
            NoPositionReason::AllCandidatesCollide { tried } => {
                write!(f, "all {tried} candidate(s) collide")
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TowerError {
    #[error("block {index} could not be placed after {attempts} attempt(s)")]
    BlockUnplaceable { index: usize, attempts: usize },
    #[error("{what} quota exhausted")]
    QuotaExhausted { what: &'static str },
    #[error("invalid tower config: {0}")]
    InvalidConfig(String),
    #[error("settled positions ({settled}) do not match blocks ({blocks})")]
    SettleMismatch { blocks: usize, settled: usize },
}
