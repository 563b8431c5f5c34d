//! Projection of significant hits into normalized plot space

use crate::coords::{normalize_contig, ChromosomeLayout, PValueScale};
use crate::types::SignificantHit;
use serde::{Deserialize, Serialize};

/// The two scales of one viewport session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotScales {
    pub chromosomes: ChromosomeLayout,
    pub pvalues: PValueScale,
}

impl PlotScales {
    pub fn new(chromosomes: ChromosomeLayout, pvalues: PValueScale) -> Self {
        Self {
            chromosomes,
            pvalues,
        }
    }

    pub fn grch38() -> Self {
        Self::new(ChromosomeLayout::grch38(), PValueScale::default())
    }

    /// Normalized `(x, y)` for a locus, `None` when the contig is unknown or
    /// the position lies outside the chromosome
    pub fn project(&self, contig: &str, position: i64, pvalue: f64) -> Option<(f64, f64)> {
        let x = self.chromosomes.get_x(contig, position)?;
        Some((x, self.pvalues.get_y(pvalue)))
    }
}

/// A hit with its position in normalized plot space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayHit {
    #[serde(flatten)]
    pub hit: SignificantHit,
    pub x_normalized: f64,
    pub y_normalized: f64,
}

impl DisplayHit {
    /// Pixel center of the hit in a `width` x `height` viewport
    pub fn pixel(&self, width: f64, height: f64) -> (f64, f64) {
        (self.x_normalized * width, self.y_normalized * height)
    }
}

/// Project hits in input order, dropping those on unknown contigs or
/// outside their chromosome
pub fn project_hits(hits: &[SignificantHit], scales: &PlotScales) -> Vec<DisplayHit> {
    let projected: Vec<DisplayHit> = hits
        .iter()
        .filter_map(|hit| project_one(hit, scales))
        .collect();

    let dropped = hits.len() - projected.len();
    if dropped > 0 {
        log::debug!(
            "Dropped {} of {} hits on unknown contigs or out-of-range positions",
            dropped,
            hits.len()
        );
    }
    projected
}

/// Like [`project_hits`], keeping only hits on `contig`
pub fn project_hits_on_contig(
    hits: &[SignificantHit],
    scales: &PlotScales,
    contig: &str,
) -> Vec<DisplayHit> {
    let wanted = normalize_contig(contig);
    hits.iter()
        .filter(|hit| normalize_contig(&hit.contig) == wanted)
        .filter_map(|hit| project_one(hit, scales))
        .collect()
}

fn project_one(hit: &SignificantHit, scales: &PlotScales) -> Option<DisplayHit> {
    let (x_normalized, y_normalized) = scales.project(&hit.contig, hit.position, hit.pvalue)?;
    Some(DisplayHit {
        hit: hit.clone(),
        x_normalized,
        y_normalized,
    })
}
