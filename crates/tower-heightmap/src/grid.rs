use rand::Rng;
use tower_geom::{
    Rotation, Vec2, Vec3, clip_to_rect, footprint_polygon, polygon_area, polygon_bounds,
};

use crate::SupportRules;

/// Guards `floor(extent / resolution)` against representation error (e.g. `20.0 / 0.1`).
const DIM_EPS: f64 = 1e-9;
/// Slack on the far edge of the covered region, same order as `DIM_EPS`.
const COVER_EPS: f64 = 1e-9;

/// Yaw-independent reach of a block's footprint: half its horizontal diagonal.
#[inline]
fn reach(size: Vec3) -> f64 {
    (size.x * size.x + size.y * size.y).sqrt() / 2.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub ix: usize,
    pub iy: usize,
}

impl GridCoord {
    #[inline]
    pub const fn new(ix: usize, iy: usize) -> Self {
        Self { ix, iy }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    /// Accumulated height of the blocks committed over this cell.
    pub height: f64,
    /// Support ratio written by the last block that raised this cell.
    pub support: f64,
}

/// Cells raised by one [`Heightmap::update_height`] call, with their new ratios.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightUpdate {
    pub raised: Vec<(GridCoord, f64)>,
}

impl HeightUpdate {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raised.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raised.len()
    }
}

/// Grid over the rectangle `[-width/2, width/2] x [-depth/2, depth/2]`, origin at its centre.
#[derive(Clone, Debug)]
pub struct Heightmap {
    width: f64,
    depth: f64,
    resolution: f64,
    nx: usize,
    ny: usize,
    cells: Vec<Cell>,
    rules: SupportRules,
}

impl Heightmap {
    /// Panics unless all three arguments are positive and finite.
    pub fn new(width: f64, depth: f64, resolution: f64) -> Self {
        assert!(
            width.is_finite() && depth.is_finite() && resolution.is_finite(),
            "heightmap dimensions must be finite"
        );
        assert!(
            width > 0.0 && depth > 0.0 && resolution > 0.0,
            "heightmap dimensions must be positive (width={width}, depth={depth}, resolution={resolution})"
        );
        let nx = (width / resolution + DIM_EPS).floor() as usize;
        let ny = (depth / resolution + DIM_EPS).floor() as usize;
        Self {
            width,
            depth,
            resolution,
            nx,
            ny,
            cells: vec![Cell::default(); nx * ny],
            rules: SupportRules::default(),
        }
    }

    /// Replace the default rules. A non-finite `ground_half_extent` collapses
    /// ground sampling to the surface centre rather than failing.
    pub fn with_rules(mut self, rules: SupportRules) -> Self {
        self.rules = rules;
        self
    }

    #[inline]
    pub fn rules(&self) -> &SupportRules {
        &self.rules
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[inline]
    pub fn extent(&self) -> (f64, f64) {
        (self.width, self.depth)
    }

    #[inline]
    fn idx(&self, c: GridCoord) -> usize {
        c.ix * self.ny + c.iy
    }

    /// Zero every cell; the next tower starts from bare ground.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn cell(&self, c: GridCoord) -> Option<Cell> {
        if c.ix < self.nx && c.iy < self.ny {
            Some(self.cells[self.idx(c)])
        } else {
            None
        }
    }

    /// All cells, x-major.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, Cell)> + '_ {
        let ny = self.ny;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (GridCoord::new(i / ny, i % ny), *c))
    }

    /// Cell containing the world point, or `None` outside the cells.
    ///
    /// The grid covers `nx * resolution` by `ny * resolution` from the min
    /// corner. When the surface is not a whole number of cells wide, the
    /// leftover strip at the far edge has no cell. The far edge of the last
    /// cell belongs to that cell.
    pub fn world_to_grid(&self, x: f64, y: f64) -> Option<GridCoord> {
        let (hw, hd) = (self.width / 2.0, self.depth / 2.0);
        let max_x = self.nx as f64 * self.resolution - hw + COVER_EPS;
        let max_y = self.ny as f64 * self.resolution - hd + COVER_EPS;
        if !(x >= -hw && x <= max_x && y >= -hd && y <= max_y) || self.nx == 0 || self.ny == 0 {
            return None;
        }
        let ix = (((x + hw) / self.resolution).floor() as usize).min(self.nx - 1);
        let iy = (((y + hd) / self.resolution).floor() as usize).min(self.ny - 1);
        Some(GridCoord::new(ix, iy))
    }

    /// Minimum corner of a cell in world coordinates.
    #[inline]
    pub fn grid_to_world(&self, c: GridCoord) -> (f64, f64) {
        (
            c.ix as f64 * self.resolution - self.width / 2.0,
            c.iy as f64 * self.resolution - self.depth / 2.0,
        )
    }

    #[inline]
    pub fn cell_center(&self, c: GridCoord) -> (f64, f64) {
        let (x, y) = self.grid_to_world(c);
        (x + self.resolution / 2.0, y + self.resolution / 2.0)
    }

    pub fn height_at(&self, x: f64, y: f64) -> Option<f64> {
        self.world_to_grid(x, y)
            .and_then(|c| self.cell(c))
            .map(|c| c.height)
    }

    pub fn support_at(&self, x: f64, y: f64) -> Option<f64> {
        self.world_to_grid(x, y)
            .and_then(|c| self.cell(c))
            .map(|c| c.support)
    }

    /// Inclusive index range of cells a world interval can touch, clamped to the grid.
    fn index_span(lo: f64, hi: f64, half: f64, res: f64, n: usize) -> Option<(usize, usize)> {
        if n == 0 {
            return None;
        }
        let a = ((lo + half) / res).floor();
        let b = ((hi + half) / res).floor();
        if b < 0.0 || a > (n - 1) as f64 {
            return None;
        }
        Some((a.max(0.0) as usize, (b as usize).min(n - 1)))
    }

    /// Commit a block's footprint: every cell covered by at least
    /// `min_support_ratio` of its area gains the block's full height and takes
    /// the new ratio as its support. Heights never decrease.
    ///
    /// A raised cell is never left below the block's top (`position.z + size.z`),
    /// so blocks dropped with a clearance do not leave the next layer touching them.
    pub fn update_height(
        &mut self,
        position: Vec3,
        size: Vec3,
        rotation: Rotation,
        min_support_ratio: f64,
    ) -> HeightUpdate {
        let polygon = footprint_polygon(position, size, rotation);
        let mut update = HeightUpdate::default();
        let Some((lo, hi)) = polygon_bounds(&polygon) else {
            return update;
        };
        let res = self.resolution;
        let (hw, hd) = (self.width / 2.0, self.depth / 2.0);
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::index_span(lo.x, hi.x, hw, res, self.nx),
            Self::index_span(lo.y, hi.y, hd, res, self.ny),
        ) else {
            return update;
        };
        let cell_area = res * res;
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                let c = GridCoord::new(ix, iy);
                let (min_x, min_y) = self.grid_to_world(c);
                let clipped = clip_to_rect(
                    &polygon,
                    Vec2::new(min_x, min_y),
                    Vec2::new(min_x + res, min_y + res),
                );
                let ratio = polygon_area(&clipped) / cell_area;
                if ratio > 0.0 && ratio >= min_support_ratio {
                    let i = self.idx(c);
                    let cell = &mut self.cells[i];
                    cell.height = (cell.height + size.z).max(position.z + size.z);
                    cell.support = ratio;
                    update.raised.push((c, ratio));
                }
            }
        }
        log::trace!(
            "heightmap: block at ({:.3}, {:.3}) size {:?} raised {} cell(s)",
            position.x,
            position.y,
            size,
            update.len()
        );
        update
    }

    /// Whether a block of `size` centred at `(x, y)` stays on the surface at any yaw.
    fn fits(&self, x: f64, y: f64, size: Vec3) -> bool {
        let reach = reach(size);
        x - reach >= -self.width / 2.0
            && x + reach <= self.width / 2.0
            && y - reach >= -self.depth / 2.0
            && y + reach <= self.depth / 2.0
    }

    /// Half extents of the ground sampling square for a block of `size`.
    ///
    /// The configured square shrunk so a block sampled anywhere inside stays on
    /// the surface at any yaw. Collapses to the centre when the block is wider
    /// than the surface or the configured extent is not finite.
    fn ground_square(&self, size: Vec3) -> (f64, f64) {
        let e = self.rules.ground_half_extent.abs();
        let e = if e.is_finite() { e } else { 0.0 };
        let r = reach(size);
        let hx = e.min(self.width / 2.0 - r).max(0.0);
        let hy = e.min(self.depth / 2.0 - r).max(0.0);
        (hx, hy)
    }

    /// Candidate base positions for a block of `size`.
    ///
    /// Ground level: exactly `ground_samples` uniform points at `base_height`,
    /// drawn from the sampling square shrunk by the block's reach. Stacked: one
    /// jittered point per cell that carries height and whose support lies in
    /// the band, at that cell's height plus the drop clearance. Stacked
    /// candidates whose footprint could leave the surface are dropped.
    pub fn valid_positions<R: Rng + ?Sized>(
        &self,
        size: Vec3,
        ground_level: bool,
        rng: &mut R,
    ) -> Vec<Vec3> {
        let rules = &self.rules;
        let out: Vec<Vec3> = if ground_level {
            let (hx, hy) = self.ground_square(size);
            (0..rules.ground_samples)
                .map(|_| {
                    let x = rng.random_range(-hx..=hx);
                    let y = rng.random_range(-hy..=hy);
                    Vec3::new(x, y, rules.base_height)
                })
                .collect()
        } else {
            let half = self.resolution / 2.0;
            let mut v = Vec::new();
            for (c, cell) in self.cells() {
                if cell.height <= 0.0 || !rules.in_band(cell.support) {
                    continue;
                }
                let (cx, cy) = self.cell_center(c);
                let x = cx + rng.random_range(-half..half);
                let y = cy + rng.random_range(-half..half);
                if self.fits(x, y, size) {
                    v.push(Vec3::new(x, y, cell.height + rules.drop_clearance));
                }
            }
            v
        };
        log::debug!(
            "heightmap: {} {} candidate(s) for size {:?}",
            out.len(),
            if ground_level { "ground" } else { "stacked" },
            size
        );
        out
    }
}
