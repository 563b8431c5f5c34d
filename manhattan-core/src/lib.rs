//! Manhattan plot overlay core
//!
//! Genome and p-value coordinate scales, projection of significant hits,
//! the cursor hit index, and the peak label layout engine.

pub mod error;
pub mod reference;
pub mod coords;
pub mod types;
pub mod project;
pub mod hit_index;
pub mod labels;
pub mod locus;

// Re-export commonly used types and functions
pub use error::{LayoutError, LayoutResult};
pub use reference::{ReferenceChromosome, ReferenceTable};
pub use coords::{normalize_contig, ChromosomeLayout, ChromosomeSpan, PValueScale};
pub use types::{BurdenResult, BurdenSet, GeneInLocus, HitType, Peak, SignificantHit};
pub use project::{project_hits, project_hits_on_contig, DisplayHit, PlotScales};
pub use hit_index::{HitIndex, HitIndexParams};
pub use labels::{layout as layout_labels, LabelLayout, LabelLayoutParams, PeakLabelNode};
pub use locus::{compute_xpos, parse_interval, parse_variant_id, Interval, VariantId};

/// Version information for the manhattan core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
