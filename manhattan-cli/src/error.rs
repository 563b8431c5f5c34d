//! Error handling for the manhattan CLI

use manhattan_core::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Invalid layout input: {source}")]
    Layout {
        #[from]
        source: LayoutError,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn parse<S: Into<String>, M: Into<String>>(file: S, message: M) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Hits are a JSON array of objects with contig, position and pvalue\n\
                 • Peaks additionally carry a genes array with gene_symbol and distance_kb\n\
                 • Ensure the file is not truncated",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your manhattan.toml configuration file\n\
                 • Use 'manhattan config --example' to generate a sample configuration",
            );
        }

        CliError::Layout { source } => match source {
            LayoutError::InvalidReference(_) => {
                message.push_str(
                    "\n\nSuggestions:\n\
                     • Chromosome names in [reference] drop the chr prefix and use upper-case letters (X, Y, MT)\n\
                     • Gaps between chromosomes must leave room inside reference_width_px",
                );
            }
            LayoutError::InvalidScale(_) => {
                message.push_str(
                    "\n\nSuggestions:\n\
                     • [scale] needs threshold > 0, 0 < linear_fraction < 1 and max_neg_log_p > threshold",
                );
            }
            LayoutError::InvalidVariantId(_) | LayoutError::InvalidInterval(_) => {
                message.push_str(
                    "\n\nSuggestions:\n\
                     • Variants look like chr1-12345-A-T\n\
                     • Intervals look like chr1:100000-200000",
                );
            }
            LayoutError::UnknownContig(_) => {}
        },

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
