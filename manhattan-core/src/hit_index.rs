//! Uniform grid index for cursor hit detection
//!
//! Hits are bucketed by pixel position into square cells. A query only looks
//! at the cell under the cursor and its neighbours, so the per-query cost
//! does not grow with the number of hits. The index is rebuilt whenever the
//! hit set or the viewport size changes.

use crate::project::DisplayHit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CELL_SIZE_PX: f64 = 20.0;
pub const DEFAULT_HIT_RADIUS_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitIndexParams {
    /// Edge length of a grid cell in pixels
    #[serde(default = "default_cell_size")]
    pub cell_size_px: f64,
    /// Maximum cursor distance (exclusive) at which a hit is reported
    #[serde(default = "default_hit_radius")]
    pub hit_radius_px: f64,
}

fn default_cell_size() -> f64 { DEFAULT_CELL_SIZE_PX }
fn default_hit_radius() -> f64 { DEFAULT_HIT_RADIUS_PX }

impl Default for HitIndexParams {
    fn default() -> Self {
        Self {
            cell_size_px: DEFAULT_CELL_SIZE_PX,
            hit_radius_px: DEFAULT_HIT_RADIUS_PX,
        }
    }
}

impl HitIndexParams {
    /// Number of neighbouring cells to scan in each direction
    ///
    /// 1 (a 3x3 block) whenever the radius does not exceed the cell size.
    fn reach(&self) -> i64 {
        (self.hit_radius_px / self.cell_size_px).ceil().max(1.0) as i64
    }

    fn is_usable(&self) -> bool {
        self.cell_size_px.is_finite()
            && self.cell_size_px > 0.0
            && self.hit_radius_px.is_finite()
            && self.hit_radius_px > 0.0
    }
}

type CellKey = (i64, i64);

/// Grid index over the display hits of one viewport
#[derive(Debug, Clone)]
pub struct HitIndex<'a> {
    hits: &'a [DisplayHit],
    /// Pixel center of each indexed hit, parallel to `hits`
    pixels: Vec<(f64, f64)>,
    cells: HashMap<CellKey, Vec<usize>>,
    params: HitIndexParams,
    width: f64,
    height: f64,
}

impl<'a> HitIndex<'a> {
    /// Build with the default 20px cells and 10px hit radius
    pub fn build(hits: &'a [DisplayHit], width: f64, height: f64) -> Self {
        Self::build_with(hits, width, height, HitIndexParams::default())
    }

    pub fn build_with(hits: &'a [DisplayHit], width: f64, height: f64, params: HitIndexParams) -> Self {
        let mut index = Self {
            hits,
            pixels: Vec::new(),
            cells: HashMap::new(),
            params,
            width,
            height,
        };

        let degenerate = !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite());
        if degenerate || !params.is_usable() {
            log::debug!(
                "Hit index left empty: viewport {}x{}, cell {}px, radius {}px",
                width, height, params.cell_size_px, params.hit_radius_px
            );
            return index;
        }

        index.pixels.reserve(hits.len());
        for (i, hit) in hits.iter().enumerate() {
            let (px, py) = hit.pixel(width, height);
            index.pixels.push((px, py));
            if px.is_finite() && py.is_finite() {
                index.cells.entry(index.cell_of(px, py)).or_default().push(i);
            }
        }

        log::debug!(
            "Built hit index: {} hits in {} cells ({}x{} viewport)",
            hits.len(),
            index.cells.len(),
            width,
            height
        );
        index
    }

    fn cell_of(&self, px: f64, py: f64) -> CellKey {
        (
            (px / self.params.cell_size_px).floor() as i64,
            (py / self.params.cell_size_px).floor() as i64,
        )
    }

    /// Nearest hit strictly inside the hit radius of the cursor, if any
    ///
    /// Equidistant hits resolve to the one earliest in the input list.
    /// Cursors further than the hit radius outside the viewport never match.
    pub fn find_nearest(&self, x: f64, y: f64) -> Option<&'a DisplayHit> {
        if self.cells.is_empty() || !self.near_viewport(x, y) {
            return None;
        }

        let radius_sq = self.params.hit_radius_px * self.params.hit_radius_px;
        let reach = self.params.reach();
        let (cx, cy) = self.cell_of(x, y);
        let mut best: Option<(f64, usize)> = None;

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                let Some(bucket) = self.cells.get(&key) else {
                    continue;
                };
                for &i in bucket {
                    let (px, py) = self.pixels[i];
                    let dist_sq = (px - x) * (px - x) + (py - y) * (py - y);
                    if dist_sq >= radius_sq {
                        continue;
                    }
                    let closer = match best {
                        None => true,
                        Some((best_sq, best_i)) => dist_sq < best_sq || (dist_sq == best_sq && i < best_i),
                    };
                    if closer {
                        best = Some((dist_sq, i));
                    }
                }
            }
        }

        best.map(|(_, i)| &self.hits[i])
    }

    fn near_viewport(&self, x: f64, y: f64) -> bool {
        let r = self.params.hit_radius_px;
        x.is_finite()
            && y.is_finite()
            && x > -r
            && x < self.width + r
            && y > -r
            && y < self.height + r
    }

    /// Number of hits placed in the grid
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn params(&self) -> HitIndexParams {
        self.params
    }
}
