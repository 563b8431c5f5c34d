//! Configuration handling for the manhattan CLI
//!
//! Supports loading configuration from manhattan.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use manhattan_core::coords::{DEFAULT_LINEAR_FRACTION, DEFAULT_LOG_THRESHOLD, DEFAULT_MAX_NEG_LOG_P};
use manhattan_core::reference::{GRCH38_GAP_PX, GRCH38_REFERENCE_WIDTH_PX};
use manhattan_core::{
    ChromosomeLayout, HitIndexParams, LabelLayoutParams, PValueScale, PlotScales,
    ReferenceChromosome, ReferenceTable,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliResult;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "manhattan.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scale: ScaleConfig,

    #[serde(default)]
    pub hit_index: HitIndexParams,

    #[serde(default)]
    pub labels: LabelLayoutParams,

    /// Custom reference table; GRCh38 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// -log10(p) where the linear band ends
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Share of the plot height given to the linear band
    #[serde(default = "default_linear_fraction")]
    pub linear_fraction: f64,

    /// -log10(p) mapped to the top of the plot
    #[serde(default = "default_max_neg_log_p")]
    pub max_neg_log_p: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    #[serde(default = "default_build")]
    pub build: String,

    #[serde(default = "default_gap_px")]
    pub gap_px: f64,

    #[serde(default = "default_reference_width_px")]
    pub reference_width_px: f64,

    pub chromosomes: Vec<ReferenceChromosome>,
}

// Default value functions
fn default_threshold() -> f64 { DEFAULT_LOG_THRESHOLD }
fn default_linear_fraction() -> f64 { DEFAULT_LINEAR_FRACTION }
fn default_max_neg_log_p() -> f64 { DEFAULT_MAX_NEG_LOG_P }
fn default_build() -> String { "custom".to_string() }
fn default_gap_px() -> f64 { GRCH38_GAP_PX }
fn default_reference_width_px() -> f64 { GRCH38_REFERENCE_WIDTH_PX }

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            linear_fraction: default_linear_fraction(),
            max_neg_log_p: default_max_neg_log_p(),
        }
    }
}

impl ReferenceConfig {
    pub fn to_table(&self) -> ReferenceTable {
        ReferenceTable::new(
            self.build.clone(),
            self.chromosomes.iter().map(|c| (c.name.clone(), c.length)),
            self.gap_px,
            self.reference_width_px,
        )
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        let mut config = Self::default();
        config.reference = Some(ReferenceConfig {
            build: "toy".to_string(),
            gap_px: default_gap_px(),
            reference_width_px: default_reference_width_px(),
            chromosomes: vec![
                ReferenceChromosome { name: "1".to_string(), length: 1_000_000 },
                ReferenceChromosome { name: "2".to_string(), length: 500_000 },
            ],
        });
        Ok(toml::to_string_pretty(&config)?)
    }

    /// Validated scales for this configuration
    pub fn plot_scales(&self) -> CliResult<PlotScales> {
        let chromosomes = match &self.reference {
            Some(reference) => ChromosomeLayout::new(&reference.to_table())?,
            None => ChromosomeLayout::grch38(),
        };
        let pvalues = PValueScale::new(
            self.scale.threshold,
            self.scale.linear_fraction,
            self.scale.max_neg_log_p,
        )?;
        Ok(PlotScales::new(chromosomes, pvalues))
    }
}
