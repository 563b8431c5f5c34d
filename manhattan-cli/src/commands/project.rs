//! Project command - map significant hits into normalized plot space

use anyhow::Result;
use manhattan_core::{parse_interval, project_hits, project_hits_on_contig, DisplayHit, SignificantHit};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliResult;

/// Project `hits`, optionally restricted to one chromosome or one interval
pub fn run(
    config: &Config,
    hits: &[SignificantHit],
    contig: Option<&str>,
    region: Option<&str>,
) -> CliResult<Vec<DisplayHit>> {
    let scales = config.plot_scales()?;

    let in_region: Vec<SignificantHit>;
    let hits = match region {
        Some(region) => {
            let interval = parse_interval(region)?;
            in_region = hits
                .iter()
                .filter(|hit| interval.contains(&hit.contig, hit.position))
                .cloned()
                .collect();
            log::debug!("{} of {} hits inside {}", in_region.len(), hits.len(), region);
            &in_region[..]
        }
        None => hits,
    };

    Ok(match contig {
        Some(contig) => project_hits_on_contig(hits, &scales, contig),
        None => project_hits(hits, &scales),
    })
}

pub fn execute(
    config: &Config,
    hits_path: PathBuf,
    contig: Option<String>,
    region: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    log::info!("Projecting hits from {}", hits_path.display());

    let hits: Vec<SignificantHit> = super::read_json(&hits_path)?;
    let projected = run(config, &hits, contig.as_deref(), region.as_deref())?;

    log::info!("Projected {} of {} hits", projected.len(), hits.len());
    super::write_json(&projected, output.as_deref())?;
    Ok(())
}
