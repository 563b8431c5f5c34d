//! Chromosomes command - dump the active chromosome layout and axis ticks

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliResult;

#[derive(Debug, Clone, Serialize)]
pub struct ChromosomeReport {
    pub build: String,
    pub reference_width_px: f64,
    pub px_per_bp: f64,
    pub chromosomes: Vec<ChromosomeRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChromosomeRow {
    pub name: String,
    pub length_bp: u64,
    pub start_normalized: f64,
    pub end_normalized: f64,
    /// Tick position for the axis label
    pub mid_normalized: f64,
}

pub fn run(config: &Config) -> CliResult<ChromosomeReport> {
    let scales = config.plot_scales()?;
    let layout = &scales.chromosomes;

    Ok(ChromosomeReport {
        build: layout.build().to_string(),
        reference_width_px: layout.reference_width_px(),
        px_per_bp: layout.px_per_bp(),
        chromosomes: layout
            .chromosomes()
            .iter()
            .map(|span| ChromosomeRow {
                name: span.name.clone(),
                length_bp: span.length_bp,
                start_normalized: span.start_normalized,
                end_normalized: span.end_normalized,
                mid_normalized: span.mid_normalized(),
            })
            .collect(),
    })
}

pub fn execute(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let report = run(config)?;
    log::info!("{} layout with {} chromosomes", report.build, report.chromosomes.len());
    super::write_json(&report, output.as_deref())?;
    Ok(())
}
