//! Reference layout tables
//!
//! A reference table pins the chromosome order, lengths, gap width and
//! reference pixel width used by the renderer of the background image. The
//! four values are versioned together: changing any one of them moves every
//! overlay point relative to the image.

use crate::coords::normalize_contig;
use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pixel gap between adjacent chromosomes in the reference image
pub const GRCH38_GAP_PX: f64 = 4.0;

/// Width in pixels of the reference image the layout was computed against
pub const GRCH38_REFERENCE_WIDTH_PX: f64 = 3000.0;

/// GRCh38 primary assembly lengths in plot order
pub const GRCH38_CHROMOSOMES: [(&str, u64); 23] = [
    ("1", 248_956_422),
    ("2", 242_193_529),
    ("3", 198_295_559),
    ("4", 190_214_555),
    ("5", 181_538_259),
    ("6", 170_805_979),
    ("7", 159_345_973),
    ("8", 145_138_636),
    ("9", 138_394_717),
    ("10", 133_797_422),
    ("11", 135_086_622),
    ("12", 133_275_309),
    ("13", 114_364_328),
    ("14", 107_043_718),
    ("15", 101_991_189),
    ("16", 90_338_345),
    ("17", 83_257_441),
    ("18", 80_373_285),
    ("19", 58_617_616),
    ("20", 64_444_167),
    ("21", 46_709_983),
    ("22", 50_818_468),
    ("X", 156_040_895),
];

/// One chromosome entry of a reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceChromosome {
    /// Name without a `chr` prefix (e.g. "1", "X")
    pub name: String,
    /// Length in base pairs
    pub length: u64,
}

/// Ordered chromosome lengths plus the pixel constants of the rendered image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    /// Build label, e.g. "GRCh38"
    pub build: String,
    pub chromosomes: Vec<ReferenceChromosome>,
    pub gap_px: f64,
    pub reference_width_px: f64,
}

impl ReferenceTable {
    /// The GRCh38 table used by the production Manhattan images
    pub fn grch38() -> Self {
        Self {
            build: "GRCh38".to_string(),
            chromosomes: GRCH38_CHROMOSOMES
                .iter()
                .map(|&(name, length)| ReferenceChromosome {
                    name: name.to_string(),
                    length,
                })
                .collect(),
            gap_px: GRCH38_GAP_PX,
            reference_width_px: GRCH38_REFERENCE_WIDTH_PX,
        }
    }

    /// Build a custom table from `(name, length)` pairs
    pub fn new<S: Into<String>>(
        build: S,
        chromosomes: impl IntoIterator<Item = (String, u64)>,
        gap_px: f64,
        reference_width_px: f64,
    ) -> Self {
        Self {
            build: build.into(),
            chromosomes: chromosomes
                .into_iter()
                .map(|(name, length)| ReferenceChromosome { name, length })
                .collect(),
            gap_px,
            reference_width_px,
        }
    }

    pub fn total_length(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.length).sum()
    }

    /// Total pixels spent on inter-chromosome gaps, `(n - 1) * gap_px`
    pub fn total_gap_px(&self) -> f64 {
        self.chromosomes.len().saturating_sub(1) as f64 * self.gap_px
    }

    /// Check the table can produce a non-degenerate layout
    pub fn validate(&self) -> LayoutResult<()> {
        if self.chromosomes.is_empty() {
            return Err(LayoutError::invalid_reference("no chromosomes"));
        }
        if !(self.reference_width_px.is_finite() && self.reference_width_px > 0.0) {
            return Err(LayoutError::invalid_reference(format!(
                "reference width must be positive, got {}",
                self.reference_width_px
            )));
        }
        if !(self.gap_px.is_finite() && self.gap_px >= 0.0) {
            return Err(LayoutError::invalid_reference(format!(
                "gap must be non-negative, got {}",
                self.gap_px
            )));
        }
        if self.total_gap_px() >= self.reference_width_px {
            return Err(LayoutError::invalid_reference(format!(
                "gaps ({}px) leave no room in a {}px reference width",
                self.total_gap_px(),
                self.reference_width_px
            )));
        }

        let mut seen = HashSet::new();
        for chrom in &self.chromosomes {
            if chrom.length == 0 {
                return Err(LayoutError::invalid_reference(format!(
                    "chromosome {} has zero length",
                    chrom.name
                )));
            }
            if chrom.name.is_empty() || normalize_contig(&chrom.name) != chrom.name {
                return Err(LayoutError::invalid_reference(format!(
                    "chromosome name '{}' is not in normalized form (expected '{}')",
                    chrom.name,
                    normalize_contig(&chrom.name)
                )));
            }
            if !seen.insert(chrom.name.as_str()) {
                return Err(LayoutError::invalid_reference(format!(
                    "duplicate chromosome {}",
                    chrom.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::grch38()
    }
}
