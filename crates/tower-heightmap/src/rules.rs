/// Thresholds and sampling parameters for support bookkeeping and candidate generation.
#[derive(Clone, Debug, PartialEq)]
pub struct SupportRules {
    /// A cell is raised by a committed block when `covered_area / cell_area` reaches this.
    pub min_support_ratio: f64,
    /// Stacked candidates come from cells with `band_min <= support < band_max`.
    pub band_min: f64,
    pub band_max: f64,
    /// Number of ground-level samples per request.
    pub ground_samples: usize,
    /// Ground samples are drawn from `[-h, h]` on both axes.
    pub ground_half_extent: f64,
    /// z of ground-level candidates.
    pub base_height: f64,
    /// Gap left between a stacked candidate's base and the surface below it.
    pub drop_clearance: f64,
}

impl Default for SupportRules {
    fn default() -> Self {
        Self {
            min_support_ratio: 0.5,
            band_min: 0.5,
            band_max: 1.0,
            ground_samples: 5,
            ground_half_extent: 1.0,
            base_height: 0.0,
            drop_clearance: 1e-3,
        }
    }
}

impl SupportRules {
    #[inline]
    pub fn in_band(&self, support: f64) -> bool {
        support >= self.band_min && support < self.band_max
    }
}
