//! Coordinate systems for the Manhattan overlay
//!
//! `ChromosomeLayout` maps `(contig, position)` onto the normalized x axis of
//! the background image and `PValueScale` maps a p-value onto its normalized
//! y axis. Both are immutable values built once per viewport session and
//! passed to whichever component needs them.

use crate::error::{LayoutError, LayoutResult};
use crate::reference::ReferenceTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strip a leading `chr` prefix and upper-case sex/mito chromosome letters
///
/// `"chr1"` and `"1"` both normalize to `"1"`, `"chrx"` to `"X"`.
pub fn normalize_contig(contig: &str) -> String {
    let trimmed = contig.trim();
    let bare = trimmed
        .strip_prefix("chr")
        .or_else(|| trimmed.strip_prefix("Chr"))
        .or_else(|| trimmed.strip_prefix("CHR"))
        .unwrap_or(trimmed);
    if bare.chars().all(|c| c.is_ascii_digit()) {
        bare.to_string()
    } else {
        bare.to_ascii_uppercase()
    }
}

/// Placement of one chromosome on the normalized x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeSpan {
    pub name: String,
    pub start_normalized: f64,
    pub end_normalized: f64,
    pub length_bp: u64,
    /// Pixel offset of base 0 in the reference image
    pub offset_px: f64,
}

impl ChromosomeSpan {
    /// Center of the span, used for axis tick labels
    pub fn mid_normalized(&self) -> f64 {
        (self.start_normalized + self.end_normalized) * 0.5
    }

    pub fn contains(&self, x_normalized: f64) -> bool {
        x_normalized >= self.start_normalized && x_normalized <= self.end_normalized
    }
}

/// Linear genome-to-x mapping matching the rendered reference image
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeLayout {
    build: String,
    spans: Vec<ChromosomeSpan>,
    by_name: HashMap<String, usize>,
    px_per_bp: f64,
    reference_width_px: f64,
}

impl ChromosomeLayout {
    /// Build a layout from a custom reference table
    pub fn new(table: &ReferenceTable) -> LayoutResult<Self> {
        table.validate()?;
        Ok(Self::from_validated(table))
    }

    /// Layout for the built-in GRCh38 table
    pub fn grch38() -> Self {
        Self::from_validated(&ReferenceTable::grch38())
    }

    fn from_validated(table: &ReferenceTable) -> Self {
        let width = table.reference_width_px;
        let usable_px = width - table.total_gap_px();
        let px_per_bp = usable_px / table.total_length() as f64;

        let mut spans = Vec::with_capacity(table.chromosomes.len());
        let mut by_name = HashMap::with_capacity(table.chromosomes.len());
        let mut offset_px = 0.0;

        for (idx, chrom) in table.chromosomes.iter().enumerate() {
            let chrom_px = chrom.length as f64 * px_per_bp;
            spans.push(ChromosomeSpan {
                name: chrom.name.clone(),
                start_normalized: offset_px / width,
                end_normalized: ((offset_px + chrom_px) / width).min(1.0),
                length_bp: chrom.length,
                offset_px,
            });
            by_name.insert(chrom.name.clone(), idx);
            offset_px += chrom_px + table.gap_px;
        }

        log::debug!(
            "Built {} chromosome layout: {} chromosomes, {:.6e} px/bp",
            table.build,
            spans.len(),
            px_per_bp
        );

        Self {
            build: table.build.clone(),
            spans,
            by_name,
            px_per_bp,
            reference_width_px: width,
        }
    }

    pub fn build(&self) -> &str {
        &self.build
    }

    pub fn chromosomes(&self) -> &[ChromosomeSpan] {
        &self.spans
    }

    pub fn px_per_bp(&self) -> f64 {
        self.px_per_bp
    }

    pub fn reference_width_px(&self) -> f64 {
        self.reference_width_px
    }

    /// Look up a chromosome, accepting either `chr`-prefixed or bare names
    pub fn span(&self, contig: &str) -> Option<&ChromosomeSpan> {
        self.by_name
            .get(&normalize_contig(contig))
            .map(|&idx| &self.spans[idx])
    }

    pub fn contains_contig(&self, contig: &str) -> bool {
        self.span(contig).is_some()
    }

    /// Normalized x of `position` on `contig`
    ///
    /// `None` for unknown contigs and for positions outside
    /// `[0, length_bp]`, which would land in a gap or a neighbouring span.
    pub fn get_x(&self, contig: &str, position: i64) -> Option<f64> {
        let span = self.span(contig)?;
        if position < 0 || position as u64 > span.length_bp {
            return None;
        }
        let x = (span.offset_px + position as f64 * self.px_per_bp) / self.reference_width_px;
        Some(x.min(span.end_normalized))
    }

    /// Inverse of [`get_x`](Self::get_x); returns `None` inside gaps or
    /// outside `[0, 1]`
    pub fn locate(&self, x_normalized: f64) -> Option<(&str, u64)> {
        if !x_normalized.is_finite() {
            return None;
        }
        let span = self.spans.iter().find(|s| s.contains(x_normalized))?;
        let px = x_normalized * self.reference_width_px - span.offset_px;
        let position = (px / self.px_per_bp).round().max(0.0) as u64;
        Some((span.name.as_str(), position.min(span.length_bp)))
    }
}

impl Default for ChromosomeLayout {
    fn default() -> Self {
        Self::grch38()
    }
}

/// Default -log10(p) boundary between the linear and logarithmic bands
pub const DEFAULT_LOG_THRESHOLD: f64 = 10.0;
/// Default share of the plot height given to the linear band
pub const DEFAULT_LINEAR_FRACTION: f64 = 0.6;
/// Default -log10(p) mapped to the top of the plot
pub const DEFAULT_MAX_NEG_LOG_P: f64 = 300.0;

/// Hybrid linear/log p-value scale
///
/// `0 <= -log10(p) <= threshold` fills the bottom `linear_fraction` of the
/// plot linearly; larger values are compressed logarithmically into the rest
/// and clamp at `max_neg_log_p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PValueScale {
    pub threshold: f64,
    pub linear_fraction: f64,
    pub max_neg_log_p: f64,
}

impl PValueScale {
    pub fn new(threshold: f64, linear_fraction: f64, max_neg_log_p: f64) -> LayoutResult<Self> {
        let scale = Self {
            threshold,
            linear_fraction,
            max_neg_log_p,
        };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(LayoutError::invalid_scale(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !(self.linear_fraction > 0.0 && self.linear_fraction < 1.0) {
            return Err(LayoutError::invalid_scale(format!(
                "linear fraction must lie in (0, 1), got {}",
                self.linear_fraction
            )));
        }
        if !(self.max_neg_log_p.is_finite() && self.max_neg_log_p > self.threshold) {
            return Err(LayoutError::invalid_scale(format!(
                "max -log10(p) {} must exceed the threshold {}",
                self.max_neg_log_p, self.threshold
            )));
        }
        Ok(())
    }

    /// Normalized y for a p-value; 0 is the top of the plot
    ///
    /// p-values outside `(0, 1]` (and NaN) map to the bottom.
    pub fn get_y(&self, pvalue: f64) -> f64 {
        if !(pvalue > 0.0 && pvalue <= 1.0) {
            return 1.0;
        }
        self.get_y_from_neg_log_p(-pvalue.log10())
    }

    /// Normalized y for an already transformed -log10(p)
    pub fn get_y_from_neg_log_p(&self, neg_log_p: f64) -> f64 {
        if neg_log_p.is_nan() || neg_log_p <= 0.0 {
            return 1.0;
        }

        let from_bottom = if neg_log_p <= self.threshold {
            (neg_log_p / self.threshold) * self.linear_fraction
        } else {
            let log_position =
                (neg_log_p / self.threshold).ln() / (self.max_neg_log_p / self.threshold).ln();
            self.linear_fraction + log_position.min(1.0) * (1.0 - self.linear_fraction)
        };

        (1.0 - from_bottom).clamp(0.0, 1.0)
    }
}

impl Default for PValueScale {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOG_THRESHOLD,
            linear_fraction: DEFAULT_LINEAR_FRACTION,
            max_neg_log_p: DEFAULT_MAX_NEG_LOG_P,
        }
    }
}
