use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use commands::labels::LabelOverrides;
use commands::nearest::Query;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "manhattan")]
#[command(about = "Manhattan plot overlay engine - projection, hit lookup and peak labels")]
#[command(version)]
#[command(long_about = "
Computes the interactive overlay of a pre-rendered Manhattan plot: where each
significant hit sits on the background image, which hit is under the cursor,
and where the gene labels of the top peaks go.

Examples:
  manhattan project --hits hits.json --contig chr6
  manhattan nearest --hits hits.json --width 1200 --height 600 --x 412 --y 88
  manhattan labels --peaks peaks.json --width 1200 --height 600 --max-labels 20
  manhattan locate --variant chr19-11100000-G-A
  manhattan config --example > manhattan.toml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to ./manhattan.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project significant hits into normalized plot coordinates
    Project {
        /// JSON array of significant hits
        #[arg(long)]
        hits: PathBuf,

        /// Keep only hits on this chromosome
        #[arg(long)]
        contig: Option<String>,

        /// Keep only hits inside an interval, e.g. "chr1:100000-200000"
        #[arg(long)]
        region: Option<String>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find the hit under a cursor position
    Nearest {
        /// JSON array of significant hits
        #[arg(long)]
        hits: PathBuf,

        /// Viewport width in pixels
        #[arg(long)]
        width: f64,

        /// Viewport height in pixels
        #[arg(long)]
        height: f64,

        /// Cursor x in pixels
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Cursor y in pixels
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Hit radius in pixels, overriding [hit_index]
        #[arg(long)]
        radius: Option<f64>,

        #[arg(long)]
        contig: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lay out gene labels for the most significant peaks
    Labels {
        /// JSON array of peaks with their implicated genes
        #[arg(long)]
        peaks: PathBuf,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Maximum number of labels, overriding [labels]
        #[arg(long)]
        max_labels: Option<usize>,

        /// Only label peaks on this chromosome
        #[arg(long)]
        contig: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the chromosome layout of the active reference
    Chromosomes {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a normalized x position or a variant ID
    Locate {
        /// Normalized x in [0, 1]
        #[arg(long, conflicts_with = "variant")]
        x: Option<f64>,

        /// Variant ID such as chr1-12345-A-T
        #[arg(long)]
        variant: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the active configuration
    Config {
        /// Print a sample configuration file instead
        #[arg(long)]
        example: bool,

        /// Save the active configuration to this TOML file
        #[arg(short, long, conflicts_with = "example")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Project { hits, contig, region, output } => {
            commands::project::execute(&config, hits, contig, region, output)
        }
        Commands::Nearest { hits, width, height, x, y, radius, contig, output } => {
            let query = Query { width, height, x, y };
            commands::nearest::execute(&config, hits, query, radius, contig, output)
        }
        Commands::Labels { peaks, width, height, max_labels, contig, output } => {
            let overrides = LabelOverrides { max_labels, contig };
            commands::labels::execute(&config, peaks, width, height, overrides, output)
        }
        Commands::Chromosomes { output } => commands::chromosomes::execute(&config, output),
        Commands::Locate { x, variant, output } => {
            commands::locate::execute(&config, x, variant, output)
        }
        Commands::Config { example, output } => cmd_config(&config, example, output),
    }
}

fn cmd_config(config: &Config, example: bool, output: Option<PathBuf>) -> Result<()> {
    if let Some(path) = output {
        config.save_to_file(&path)?;
        log::info!("Saved configuration to {}", path.display());
        return Ok(());
    }

    let content = if example {
        Config::example_toml()?
    } else {
        toml::to_string_pretty(config).map_err(CliError::from)?
    };
    print!("{}", content);
    Ok(())
}
