//! Greedy randomized tower placement on top of the support heightmap and the SAT detector.
//!
//! All randomness flows through an explicitly passed [`rand::Rng`]; the same
//! seed and inputs replay the same tower.
#![forbid(unsafe_code)]

mod block;
pub mod config;
mod error;
mod place;
mod requests;
mod session;
pub mod settle;

pub use block::{Block, BlockId, BlockSet};
pub use config::{BlockParams, ConfigError, TowerGenConfig, TowerGenParams, load_params_from_path};
pub use error::{NoPositionReason, PlacementError, TowerError};
pub use place::{check_collision, place_block};
pub use requests::{BlockRequest, plan_requests};
pub use session::{TowerSession, build_tower};
pub use settle::{SettleOutcome, Side, assess_settle};
