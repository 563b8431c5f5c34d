//! Locate command - translate between plot x and genomic loci

use anyhow::Result;
use manhattan_core::{compute_xpos, parse_variant_id, VariantId};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliResult;

/// Locus under a normalized x position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocusReport {
    pub contig: String,
    pub position: u64,
    pub xpos: Option<i64>,
}

/// Plot position of a variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantReport {
    #[serde(flatten)]
    pub variant: VariantId,
    /// `None` when the variant's chromosome is not in the layout or the
    /// position lies past its end
    pub x_normalized: Option<f64>,
}

/// Locus at `x_normalized`, `None` over gaps and outside the plot
pub fn locate_x(config: &Config, x_normalized: f64) -> CliResult<Option<LocusReport>> {
    let scales = config.plot_scales()?;
    Ok(scales
        .chromosomes
        .locate(x_normalized)
        .map(|(contig, position)| LocusReport {
            contig: contig.to_string(),
            position,
            xpos: compute_xpos(contig, position as i64),
        }))
}

pub fn locate_variant(config: &Config, variant_id: &str) -> CliResult<VariantReport> {
    let variant = parse_variant_id(variant_id)?;
    let scales = config.plot_scales()?;
    let x_normalized = scales.chromosomes.get_x(&variant.contig, variant.position);
    Ok(VariantReport {
        variant,
        x_normalized,
    })
}

pub fn execute(
    config: &Config,
    x: Option<f64>,
    variant: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let output = output.as_deref();
    match (x, variant) {
        (_, Some(variant)) => super::write_json(&locate_variant(config, &variant)?, output)?,
        (Some(x), None) => super::write_json(&locate_x(config, x)?, output)?,
        (None, None) => anyhow::bail!("locate needs --x or --variant"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_variant_roundtrip() {
        let config = Config::default();
        let report = locate_variant(&config, "chr19-11100000-G-A").unwrap();
        assert_eq!(report.variant.xpos, 19_011_100_000);
        let x = report.x_normalized.unwrap();

        let locus = locate_x(&config, x).unwrap().unwrap();
        assert_eq!(locus.contig, "19");
        assert!((locus.position as i64 - 11_100_000).abs() < 10);
        assert_eq!(locus.xpos, compute_xpos("19", locus.position as i64));
    }

    #[test]
    fn test_unlisted_chromosome() {
        let report = locate_variant(&Config::default(), "chrY-2000000-C-T").unwrap();
        assert_eq!(report.variant.xpos, 24_002_000_000);
        assert!(report.x_normalized.is_none());
    }

    #[test]
    fn test_execute_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locus.json");
        execute(
            &Config::default(),
            None,
            Some("chr1-12345-A-T".to_string()),
            Some(path.clone()),
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["xpos"], 1_000_012_345i64);
        assert_eq!(value["contig"], "1");
        assert!(value["x_normalized"].as_f64().is_some());

        assert!(execute(&Config::default(), None, None, Some(path)).is_err());
    }

    #[test]
    fn test_variant_past_chromosome_end() {
        let report = locate_variant(&Config::default(), "chr21-900000000-C-T").unwrap();
        assert!(report.x_normalized.is_none());
    }

    #[test]
    fn test_gap_and_bad_input() {
        let config = Config::default();
        assert!(locate_x(&config, 1.5).unwrap().is_none());
        let err = locate_variant(&config, "not-a-variant").unwrap_err();
        assert!(matches!(err, CliError::Layout { .. }));
    }
}
