use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tower_geom::Vec3;
use tower_heightmap::SupportRules;

use crate::TowerError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading tower config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing tower config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] TowerError),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TowerGenConfig {
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub support: Support,
    #[serde(default)]
    pub blocks: Blocks,
    #[serde(default)]
    pub session: Session,
}

impl TowerGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub depth: f64,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}
fn default_extent() -> f64 {
    20.0
}
fn default_resolution() -> f64 {
    0.5
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            width: default_extent(),
            depth: default_extent(),
            resolution: default_resolution(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Support {
    #[serde(default = "default_min_support_ratio")]
    pub min_support_ratio: f64,
    #[serde(default = "default_band_min")]
    pub band_min: f64,
    #[serde(default = "default_band_max")]
    pub band_max: f64,
    #[serde(default = "default_ground_samples")]
    pub ground_samples: usize,
    #[serde(default = "default_ground_half_extent")]
    pub ground_half_extent: f64,
    #[serde(default)]
    pub base_height: f64,
    #[serde(default = "default_drop_clearance")]
    pub drop_clearance: f64,
}
fn default_min_support_ratio() -> f64 {
    0.5
}
fn default_band_min() -> f64 {
    0.5
}
fn default_band_max() -> f64 {
    1.0
}
fn default_ground_samples() -> usize {
    5
}
fn default_ground_half_extent() -> f64 {
    1.0
}
fn default_drop_clearance() -> f64 {
    1e-3
}
impl Default for Support {
    fn default() -> Self {
        Self {
            min_support_ratio: default_min_support_ratio(),
            band_min: default_band_min(),
            band_max: default_band_max(),
            ground_samples: default_ground_samples(),
            ground_half_extent: default_ground_half_extent(),
            base_height: 0.0,
            drop_clearance: default_drop_clearance(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SizeQuota {
    pub size: [f64; 3],
    pub count: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ColorQuota {
    pub name: String,
    pub count: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Blocks {
    #[serde(default = "default_block_count")]
    pub count: usize,
    #[serde(default = "default_pedestal_min")]
    pub pedestal_min: usize,
    #[serde(default = "default_pedestal_max")]
    pub pedestal_max: usize,
    #[serde(default = "default_pedestal_size")]
    pub pedestal_size: [f64; 3],
    #[serde(default = "default_sizes")]
    pub sizes: Vec<SizeQuota>,
    #[serde(default = "default_colors")]
    pub colors: Vec<ColorQuota>,
    #[serde(default = "default_material")]
    pub material: String,
    #[serde(default = "default_yaw_degrees")]
    pub yaw_degrees: Vec<f64>,
}
fn default_block_count() -> usize {
    17
}
fn default_pedestal_min() -> usize {
    2
}
fn default_pedestal_max() -> usize {
    5
}
fn default_pedestal_size() -> [f64; 3] {
    [0.5, 0.5, 1.5]
}
fn default_sizes() -> Vec<SizeQuota> {
    vec![
        SizeQuota {
            size: [0.5, 0.5, 1.5],
            count: 8,
        },
        SizeQuota {
            size: [1.5, 0.5, 0.5],
            count: 9,
        },
    ]
}
fn default_colors() -> Vec<ColorQuota> {
    [("yellow", 7), ("blue", 9), ("white", 1)]
        .into_iter()
        .map(|(name, count)| ColorQuota {
            name: name.to_string(),
            count,
        })
        .collect()
}
fn default_material() -> String {
    "wood".to_string()
}
fn default_yaw_degrees() -> Vec<f64> {
    vec![0.0, 90.0, 180.0, 270.0]
}
impl Default for Blocks {
    fn default() -> Self {
        Self {
            count: default_block_count(),
            pedestal_min: default_pedestal_min(),
            pedestal_max: default_pedestal_max(),
            pedestal_size: default_pedestal_size(),
            sizes: default_sizes(),
            colors: default_colors(),
            material: default_material(),
            yaw_degrees: default_yaw_degrees(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_settle_tolerance")]
    pub settle_tolerance: f64,
}
fn default_max_attempts() -> usize {
    100
}
fn default_settle_tolerance() -> f64 {
    0.05
}
impl Default for Session {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            settle_tolerance: default_settle_tolerance(),
        }
    }
}

/// What a tower needs: the block mix and how it is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockParams {
    pub count: usize,
    pub pedestal_min: usize,
    pub pedestal_max: usize,
    pub pedestal_size: Vec3,
    pub sizes: Vec<(Vec3, usize)>,
    pub colors: Vec<(String, usize)>,
    pub material: String,
    pub yaw_degrees: Vec<f64>,
}

// Validated snapshot of the config used by the session
#[derive(Clone, Debug, PartialEq)]
pub struct TowerGenParams {
    pub width: f64,
    pub depth: f64,
    pub resolution: f64,
    pub rules: SupportRules,
    pub blocks: BlockParams,
    pub max_attempts: usize,
    pub settle_tolerance: f64,
}

impl Default for TowerGenParams {
    fn default() -> Self {
        let cfg = TowerGenConfig::default();
        Self::snapshot(&cfg)
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn invalid(msg: impl Into<String>) -> TowerError {
    TowerError::InvalidConfig(msg.into())
}

impl TowerGenParams {
    fn snapshot(cfg: &TowerGenConfig) -> Self {
        let b = &cfg.blocks;
        let s = &cfg.support;
        Self {
            width: cfg.surface.width,
            depth: cfg.surface.depth,
            resolution: cfg.surface.resolution,
            rules: SupportRules {
                min_support_ratio: s.min_support_ratio,
                band_min: s.band_min,
                band_max: s.band_max,
                ground_samples: s.ground_samples,
                ground_half_extent: s.ground_half_extent,
                base_height: s.base_height,
                drop_clearance: s.drop_clearance,
            },
            blocks: BlockParams {
                count: b.count,
                pedestal_min: b.pedestal_min,
                pedestal_max: b.pedestal_max,
                pedestal_size: Vec3::from(b.pedestal_size),
                sizes: b.sizes.iter().map(|q| (Vec3::from(q.size), q.count)).collect(),
                colors: b.colors.iter().map(|q| (q.name.clone(), q.count)).collect(),
                material: b.material.clone(),
                yaw_degrees: b.yaw_degrees.clone(),
            },
            max_attempts: cfg.session.max_attempts,
            settle_tolerance: cfg.session.settle_tolerance,
        }
    }

    pub fn from_config(cfg: &TowerGenConfig) -> Result<Self, TowerError> {
        let p = Self::snapshot(cfg);
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<(), TowerError> {
        if !(positive(self.width) && positive(self.depth) && positive(self.resolution)) {
            return Err(invalid("surface width, depth and resolution must be positive"));
        }
        if self.resolution > self.width.min(self.depth) {
            return Err(invalid("resolution is larger than the surface"));
        }
        let r = &self.rules;
        if !(r.min_support_ratio > 0.0 && r.min_support_ratio <= 1.0) {
            return Err(invalid("min_support_ratio must lie in (0, 1]"));
        }
        if !(r.band_min >= 0.0 && r.band_min < r.band_max) {
            return Err(invalid("support band must satisfy 0 <= band_min < band_max"));
        }
        if r.ground_samples == 0 || !r.ground_half_extent.is_finite() || r.ground_half_extent < 0.0 {
            return Err(invalid("ground sampling needs at least one sample and a finite extent"));
        }
        if !r.base_height.is_finite() || !r.drop_clearance.is_finite() || r.drop_clearance < 0.0 {
            return Err(invalid("base_height and drop_clearance must be finite, clearance >= 0"));
        }
        let b = &self.blocks;
        if b.pedestal_min > b.pedestal_max {
            return Err(invalid("pedestal_min exceeds pedestal_max"));
        }
        let extents_ok = |v: Vec3| positive(v.x) && positive(v.y) && positive(v.z);
        if !extents_ok(b.pedestal_size) || !b.sizes.iter().all(|(s, _)| extents_ok(*s)) {
            return Err(invalid("block sizes must be positive"));
        }
        let reach = (b.pedestal_size.x.powi(2) + b.pedestal_size.y.powi(2)).sqrt() / 2.0;
        if reach > self.width.min(self.depth) / 2.0 {
            return Err(invalid("pedestal footprint does not fit on the surface"));
        }
        if b.yaw_degrees.is_empty() || !b.yaw_degrees.iter().all(|d| d.is_finite()) {
            return Err(invalid("yaw_degrees needs at least one finite angle"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be at least 1"));
        }
        if !(self.settle_tolerance >= 0.0) {
            return Err(invalid("settle_tolerance must be >= 0"));
        }
        Ok(())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<TowerGenParams, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg = TowerGenConfig::from_toml_str(&s)?;
    Ok(TowerGenParams::from_config(&cfg)?)
}
