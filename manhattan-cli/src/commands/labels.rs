//! Labels command - lay out angled gene labels above the top peaks

use anyhow::Result;
use manhattan_core::{layout_labels, LabelLayout, LabelLayoutParams, Peak};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Per-invocation overrides of the `[labels]` section
#[derive(Debug, Clone, Default)]
pub struct LabelOverrides {
    pub max_labels: Option<usize>,
    pub contig: Option<String>,
}

impl LabelOverrides {
    fn apply(&self, base: &LabelLayoutParams) -> LabelLayoutParams {
        let mut params = base.clone();
        if let Some(max_labels) = self.max_labels {
            params.max_labels = max_labels;
        }
        if self.contig.is_some() {
            params.contig = self.contig.clone();
        }
        params
    }
}

pub fn run(
    config: &Config,
    peaks: &[Peak],
    width: f64,
    height: f64,
    overrides: &LabelOverrides,
) -> CliResult<LabelLayout> {
    let params = overrides.apply(&config.labels);
    if !(params.overlap_tolerance > 0.0 && params.overlap_tolerance <= 1.0) {
        return Err(CliError::validation(format!(
            "labels.overlap_tolerance must lie in (0, 1], got {}",
            params.overlap_tolerance
        )));
    }

    let scales = config.plot_scales()?;
    Ok(layout_labels(peaks, &scales, width, height, &params))
}

pub fn execute(
    config: &Config,
    peaks_path: PathBuf,
    width: f64,
    height: f64,
    overrides: LabelOverrides,
    output: Option<PathBuf>,
) -> Result<()> {
    log::info!("Laying out labels for peaks in {}", peaks_path.display());

    let peaks: Vec<Peak> = super::read_json(&peaks_path)?;
    let layout = run(config, &peaks, width, height, &overrides)?;

    log::info!(
        "Placed {} labels from {} peaks, label area {}px",
        layout.nodes.len(),
        peaks.len(),
        layout.label_area_height
    );
    super::write_json(&layout, output.as_deref())?;
    Ok(())
}
