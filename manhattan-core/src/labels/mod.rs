//! Peak label layout
//!
//! Places one angled text label per significant peak above the plot so that
//! labels do not collide. The pipeline runs in fixed order:
//!
//! 1. select the most significant peaks (up to `max_labels`)
//! 2. build one [`PeakLabelNode`] per peak, all on a shared baseline
//! 3. relax node positions with a bounded force simulation ([`force`])
//! 4. stack residual overlaps with deterministic sweeps ([`resolve`])
//! 5. shift everything so the label block starts at the top padding
//! 6. clamp x so rotated text stays inside the viewport
//!
//! Collision is tested on circles, not on the true rotated rectangles, so
//! non-overlap holds under the circle approximation only.

pub mod force;
pub mod resolve;

use crate::coords::normalize_contig;
use crate::project::PlotScales;
use crate::types::{BurdenSet, GeneInLocus, Peak};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub use resolve::overlapping_pairs;

/// Tunable constants of the label layout
///
/// The collision radius, overlap tolerance and rotation angle are empirical
/// defaults and may need retuning for other fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLayoutParams {
    /// Maximum number of peaks to label
    pub max_labels: usize,
    /// Only label peaks on this chromosome (`chr` prefix optional)
    pub contig: Option<String>,
    /// Text rotation in degrees, negative is counter-clockwise
    pub angle_deg: f64,
    /// Estimated advance per character
    pub char_width_px: f64,
    /// Extra width added to every label
    pub label_padding_px: f64,
    pub label_height_px: f64,
    /// Vertical gap between stacked labels
    pub label_spacing_px: f64,
    /// Resting y of unobstructed labels
    pub baseline_y: f64,
    pub iterations: usize,
    /// Collision passes per simulation tick
    pub collision_iterations: usize,
    pub x_strength: f64,
    pub y_strength: f64,
    pub collision_strength: f64,
    /// Fraction of the summed radii below which two labels overlap
    pub overlap_tolerance: f64,
    pub resolve_passes: usize,
    pub top_padding_px: f64,
    pub bottom_padding_px: f64,
    pub left_padding_px: f64,
    pub right_margin_px: f64,
}

impl Default for LabelLayoutParams {
    fn default() -> Self {
        Self {
            max_labels: 30,
            contig: None,
            angle_deg: -45.0,
            char_width_px: 6.5,
            label_padding_px: 4.0,
            label_height_px: 12.0,
            label_spacing_px: 4.0,
            baseline_y: 0.0,
            iterations: 400,
            collision_iterations: 3,
            x_strength: 0.3,
            y_strength: 0.05,
            collision_strength: 0.8,
            overlap_tolerance: 0.7,
            resolve_passes: 20,
            top_padding_px: 8.0,
            bottom_padding_px: 4.0,
            left_padding_px: 4.0,
            right_margin_px: 8.0,
        }
    }
}

impl LabelLayoutParams {
    fn angle_sin(&self) -> f64 {
        self.angle_deg.to_radians().sin().abs()
    }

    fn angle_cos(&self) -> f64 {
        self.angle_deg.to_radians().cos().abs()
    }

    /// Left clamp bound; rotated glyphs lean left of the anchor by
    /// `height * sin(angle)`
    fn left_margin(&self) -> f64 {
        self.label_height_px * self.angle_sin() + self.left_padding_px
    }
}

/// Simulated label for one peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakLabelNode {
    pub contig: String,
    pub position: i64,
    pub pvalue: f64,
    /// Pixel x of the peak in the plot
    pub target_x: f64,
    /// Pixel y of the peak in the plot
    pub target_y: f64,
    /// Label anchor x in the label area
    pub x: f64,
    /// Label anchor y in the label area
    pub y: f64,
    #[serde(skip)]
    pub(crate) vx: f64,
    #[serde(skip)]
    pub(crate) vy: f64,
    pub label: String,
    /// Estimated unrotated text width
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub has_burden: bool,
    pub burden_types: Vec<BurdenSet>,
    pub gene_count: usize,
}

/// Output of one layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelLayout {
    pub nodes: Vec<PeakLabelNode>,
    /// Pixels the label block needs above the plot
    pub label_area_height: f64,
}

impl LabelLayout {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            label_area_height: 0.0,
        }
    }
}

/// Lay out labels for `peaks` in a `width` x `height` plot
///
/// Degenerate viewports and empty inputs produce an empty layout. The result
/// is a pure function of its inputs.
pub fn layout(
    peaks: &[Peak],
    scales: &PlotScales,
    width: f64,
    height: f64,
    params: &LabelLayoutParams,
) -> LabelLayout {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return LabelLayout::empty();
    }

    let selected = select_peaks(peaks, params);
    let mut nodes: Vec<PeakLabelNode> = selected
        .into_iter()
        .filter_map(|peak| init_node(peak, scales, width, height, params))
        .collect();
    if nodes.is_empty() {
        return LabelLayout::empty();
    }

    force::relax(&mut nodes, params);
    let (lo, hi) = (params.left_margin(), width - params.right_margin_px);
    for node in nodes.iter_mut() {
        node.x = clamp_x(node.x, lo, hi);
    }

    let passes = resolve::resolve_overlaps(&mut nodes, params);
    let label_area_height = normalize_vertical(&mut nodes, params);

    for node in nodes.iter_mut() {
        node.x = clamp_x(node.x, lo, hi);
    }

    log::debug!(
        "Laid out {} peak labels in {} resolve passes, label area {}px",
        nodes.len(),
        passes,
        label_area_height
    );

    LabelLayout {
        nodes,
        label_area_height,
    }
}

/// Most significant peaks first, truncated to `max_labels`
fn select_peaks<'a>(peaks: &'a [Peak], params: &LabelLayoutParams) -> Vec<&'a Peak> {
    let wanted = params.contig.as_deref().map(normalize_contig);
    let mut selected: Vec<&Peak> = peaks
        .iter()
        .filter(|peak| {
            wanted
                .as_ref()
                .map_or(true, |contig| normalize_contig(&peak.contig) == *contig)
        })
        .collect();

    selected.sort_by(|a, b| compare_pvalues(a.pvalue, b.pvalue));
    selected.truncate(params.max_labels);
    selected
}

/// Ascending, with NaN after every number
fn compare_pvalues(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

fn init_node(
    peak: &Peak,
    scales: &PlotScales,
    width: f64,
    height: f64,
    params: &LabelLayoutParams,
) -> Option<PeakLabelNode> {
    if peak.genes.is_empty() {
        return None;
    }
    let (x_norm, y_norm) = scales.project(&peak.contig, peak.position, peak.pvalue)?;

    let genes = rank_genes(&peak.genes);
    let top = genes[0];
    let label = if genes.len() > 1 {
        format!("{} +{}", top.gene_symbol, genes.len() - 1)
    } else {
        top.gene_symbol.clone()
    };

    let text_width = label.chars().count() as f64 * params.char_width_px + params.label_padding_px;
    let text_height = params.label_height_px;
    let (sin, cos) = (params.angle_sin(), params.angle_cos());
    let rotated_width = text_width * cos + text_height * sin;
    let rotated_height = text_width * sin + text_height * cos;
    let radius = rotated_width.max(rotated_height) * 0.5;

    let mut burden_types: Vec<BurdenSet> = peak
        .genes
        .iter()
        .flat_map(GeneInLocus::significant_burden_sets)
        .collect();
    burden_types.sort();
    burden_types.dedup();

    let target_x = x_norm * width;
    Some(PeakLabelNode {
        contig: peak.contig.clone(),
        position: peak.position,
        pvalue: peak.pvalue,
        target_x,
        target_y: y_norm * height,
        x: target_x,
        y: params.baseline_y,
        vx: 0.0,
        vy: 0.0,
        label,
        width: text_width,
        height: text_height,
        radius,
        has_burden: peak.genes.iter().any(GeneInLocus::has_burden_evidence),
        burden_types,
        gene_count: peak.genes.len(),
    })
}

/// Burden-supported genes first, then nearest to the lead variant
fn rank_genes(genes: &[GeneInLocus]) -> Vec<&GeneInLocus> {
    let mut ranked: Vec<&GeneInLocus> = genes.iter().collect();
    ranked.sort_by(|a, b| {
        b.has_burden_evidence()
            .cmp(&a.has_burden_evidence())
            .then_with(|| a.distance_kb.abs().total_cmp(&b.distance_kb.abs()))
            .then_with(|| b.coding_variant_count.cmp(&a.coding_variant_count))
    });
    ranked
}

/// Shift nodes so the highest rotated extent sits at the top padding and
/// return the label area height
fn normalize_vertical(nodes: &mut [PeakLabelNode], params: &LabelLayoutParams) -> f64 {
    let (sin, cos) = (params.angle_sin(), params.angle_cos());
    let mut min_top = f64::INFINITY;
    let mut max_bottom = f64::NEG_INFINITY;
    for node in nodes.iter() {
        min_top = min_top.min(node.y - node.width * sin);
        max_bottom = max_bottom.max(node.y + node.height * cos);
    }
    if !min_top.is_finite() || !max_bottom.is_finite() {
        return 0.0;
    }

    let shift = params.top_padding_px - min_top;
    for node in nodes.iter_mut() {
        node.y += shift;
    }
    (max_bottom - min_top + params.top_padding_px + params.bottom_padding_px).ceil()
}

/// `clamp` that tolerates an inverted range on very narrow viewports
fn clamp_x(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BurdenResult;

    fn peak(contig: &str, position: i64, pvalue: f64, genes: &[&str]) -> Peak {
        let mut peak = Peak::new(contig, position, pvalue);
        for (i, symbol) in genes.iter().enumerate() {
            peak = peak.with_gene(GeneInLocus::new(*symbol, i as f64 * 10.0));
        }
        peak
    }

    #[test]
    fn test_empty_inputs() {
        let scales = PlotScales::grch38();
        let params = LabelLayoutParams::default();
        let out = layout(&[], &scales, 1000.0, 600.0, &params);
        assert!(out.nodes.is_empty());
        assert_eq!(out.label_area_height, 0.0);

        let peaks = vec![peak("1", 1_000_000, 1e-20, &["A"])];
        assert!(layout(&peaks, &scales, 0.0, 600.0, &params).nodes.is_empty());
        assert!(layout(&peaks, &scales, 1000.0, -1.0, &params).nodes.is_empty());
    }

    #[test]
    fn test_select_sorts_and_truncates_before_skipping() {
        let scales = PlotScales::grch38();
        let params = LabelLayoutParams {
            max_labels: 3,
            ..Default::default()
        };
        let peaks = vec![
            peak("1", 10_000_000, 1e-10, &["WEAK"]),
            peak("2", 10_000_000, 1e-40, &["STRONG"]),
            peak("chrUn", 10, 1e-50, &["UNPLACED"]),
            peak("3", 10_000_000, 1e-30, &[]),
            peak("4", 10_000_000, 1e-35, &["MIDDLE"]),
        ];
        let out = layout(&peaks, &scales, 1200.0, 600.0, &params);
        let labels: Vec<&str> = out.nodes.iter().map(|n| n.label.as_str()).collect();
        // top three are UNPLACED, STRONG, MIDDLE; UNPLACED cannot be projected
        assert_eq!(labels, vec!["STRONG", "MIDDLE"]);
    }

    #[test]
    fn test_contig_filter() {
        let scales = PlotScales::grch38();
        let params = LabelLayoutParams {
            contig: Some("chr2".to_string()),
            ..Default::default()
        };
        let peaks = vec![
            peak("1", 10_000_000, 1e-10, &["ONE"]),
            peak("chr2", 20_000_000, 1e-12, &["TWO"]),
        ];
        let out = layout(&peaks, &scales, 1200.0, 600.0, &params);
        assert_eq!(out.nodes.len(), 1);
        assert_eq!(out.nodes[0].label, "TWO");
    }

    #[test]
    fn test_label_text_and_flags() {
        let scales = PlotScales::grch38();
        let burden_gene = GeneInLocus::new("LDLR", 50.0).with_burden(BurdenResult {
            annotation: "pLoF".to_string(),
            pvalue: Some(1e-20),
            pvalue_burden: None,
            pvalue_skat: None,
        });
        let peak = Peak::new("chr19", 11_100_000, 1e-50)
            .with_gene(GeneInLocus::new("NEAREST", 1.0))
            .with_gene(burden_gene)
            .with_gene(GeneInLocus::new("OTHER", 5.0));
        let out = layout(&[peak], &scales, 1200.0, 600.0, &LabelLayoutParams::default());
        let node = &out.nodes[0];
        assert_eq!(node.label, "LDLR +2");
        assert!(node.has_burden);
        assert_eq!(node.burden_types, vec![BurdenSet::PLoF]);
        assert_eq!(node.gene_count, 3);
        assert_eq!(node.width, 7.0 * 6.5 + 4.0);
    }

    #[test]
    fn test_coding_variants_break_distance_ties() {
        let scales = PlotScales::grch38();
        let peak = Peak::new("chr2", 21_000_000, 1e-30)
            .with_gene(GeneInLocus::new("FEWER", 20.0).with_coding_variants(1))
            .with_gene(GeneInLocus::new("MORE", -20.0).with_coding_variants(5))
            .with_gene(GeneInLocus::new("FAR", 300.0).with_coding_variants(40));
        let out = layout(&[peak], &scales, 1200.0, 600.0, &LabelLayoutParams::default());
        assert_eq!(out.nodes[0].label, "MORE +2");

        let genes = vec![
            GeneInLocus::new("A", 5.0).with_coding_variants(2),
            GeneInLocus::new("B", 5.0).with_coding_variants(9),
            GeneInLocus::new("C", 1.0),
        ];
        let ranked: Vec<&str> = rank_genes(&genes)
            .into_iter()
            .map(|g| g.gene_symbol.as_str())
            .collect();
        assert_eq!(ranked, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_single_label_geometry() {
        let scales = PlotScales::grch38();
        let params = LabelLayoutParams::default();
        let peaks = vec![peak("10", 50_000_000, 1e-15, &["ABCD"])];
        let out = layout(&peaks, &scales, 1200.0, 600.0, &params);
        let node = &out.nodes[0];

        // one label settles on its target
        assert!((node.x - node.target_x).abs() < 1.0);

        let sin = std::f64::consts::FRAC_1_SQRT_2;
        let expected_top = node.y - node.width * sin;
        assert!((expected_top - params.top_padding_px).abs() < 1e-6);
        let extent = node.width * sin + node.height * sin;
        assert_eq!(
            out.label_area_height,
            (extent + params.top_padding_px + params.bottom_padding_px).ceil()
        );
    }

    #[test]
    fn test_x_is_clamped_into_viewport() {
        let scales = PlotScales::grch38();
        let params = LabelLayoutParams::default();
        let peaks = vec![
            peak("1", 0, 1e-15, &["LEFTMOST"]),
            peak("X", 156_000_000, 1e-14, &["RIGHTMOST"]),
        ];
        let out = layout(&peaks, &scales, 800.0, 400.0, &params);
        let lo = params.left_margin();
        for node in &out.nodes {
            assert!(node.x >= lo - 1e-9);
            assert!(node.x <= 800.0 - params.right_margin_px + 1e-9);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let scales = PlotScales::grch38();
        let params = LabelLayoutParams::default();
        let peaks: Vec<Peak> = (0..12)
            .map(|i| peak("6", 30_000_000 + i * 200_000, 10f64.powi(-(10 + i as i32)), &["HLA-A", "HLA-B"]))
            .collect();
        let a = layout(&peaks, &scales, 1000.0, 500.0, &params);
        let b = layout(&peaks, &scales, 1000.0, 500.0, &params);
        assert_eq!(a, b);
        assert!(overlapping_pairs(&a.nodes, params.overlap_tolerance).is_empty());
    }
}
