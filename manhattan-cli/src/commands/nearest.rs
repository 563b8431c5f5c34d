//! Nearest command - cursor hit lookup against a projected hit set

use anyhow::Result;
use manhattan_core::{project_hits, project_hits_on_contig, DisplayHit, HitIndex, SignificantHit};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliResult;

/// Cursor position and viewport of one lookup
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

pub fn run(
    config: &Config,
    hits: &[SignificantHit],
    query: Query,
    radius: Option<f64>,
    contig: Option<&str>,
) -> CliResult<Option<DisplayHit>> {
    let scales = config.plot_scales()?;
    let display = match contig {
        Some(contig) => project_hits_on_contig(hits, &scales, contig),
        None => project_hits(hits, &scales),
    };

    let mut params = config.hit_index;
    if let Some(radius) = radius {
        params.hit_radius_px = radius;
    }

    let index = HitIndex::build_with(&display, query.width, query.height, params);
    if index.is_empty() && !display.is_empty() {
        log::warn!(
            "Hit index is empty for a {}x{} viewport with {}px cells",
            query.width,
            query.height,
            params.cell_size_px
        );
    }

    Ok(index.find_nearest(query.x, query.y).cloned())
}

pub fn execute(
    config: &Config,
    hits_path: PathBuf,
    query: Query,
    radius: Option<f64>,
    contig: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let hits: Vec<SignificantHit> = super::read_json(&hits_path)?;
    let nearest = run(config, &hits, query, radius, contig.as_deref())?;

    match &nearest {
        Some(hit) => log::info!("Nearest hit to ({}, {}): {}", query.x, query.y, hit.hit.id),
        None => log::info!("No hit within range of ({}, {})", query.x, query.y),
    }
    super::write_json(&nearest, output.as_deref())?;
    Ok(())
}
