//! Genomic locus strings and xpos encoding
//!
//! xpos packs `(chromosome, position)` into one integer,
//! `contig_number * 1_000_000_000 + position`, with X = 23, Y = 24 and
//! M/MT = 25, so loci sort genome-wide as plain integers.

use crate::coords::normalize_contig;
use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};

const XPOS_CONTIG_FACTOR: i64 = 1_000_000_000;

/// Numeric code of a chromosome, `None` for unplaced or unknown contigs
pub fn contig_number(contig: &str) -> Option<i64> {
    let contig = normalize_contig(contig);
    match contig.as_str() {
        "X" => Some(23),
        "Y" => Some(24),
        "M" | "MT" => Some(25),
        other => other.parse::<i64>().ok().filter(|n| (1..=22).contains(n)),
    }
}

/// `None` for unknown contigs and for positions outside `[0, 1e9)`, which
/// would spill into the next chromosome's range
pub fn compute_xpos(contig: &str, position: i64) -> Option<i64> {
    if !is_encodable_position(position) {
        return None;
    }
    let number = contig_number(contig)?;
    number.checked_mul(XPOS_CONTIG_FACTOR)?.checked_add(position)
}

fn is_encodable_position(position: i64) -> bool {
    (0..XPOS_CONTIG_FACTOR).contains(&position)
}

/// Split an xpos back into chromosome code and position
pub fn split_xpos(xpos: i64) -> (i64, i64) {
    (xpos / XPOS_CONTIG_FACTOR, xpos % XPOS_CONTIG_FACTOR)
}

/// A parsed `chr-pos-ref-alt` identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantId {
    pub contig: String,
    pub position: i64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub xpos: i64,
}

/// Parse `"chr1-12345-A-T"` or `"1-12345-A-T"`
pub fn parse_variant_id(variant_id: &str) -> LayoutResult<VariantId> {
    let parts: Vec<&str> = variant_id.split('-').collect();
    if parts.len() != 4 || parts[2].is_empty() || parts[3].is_empty() {
        return Err(LayoutError::InvalidVariantId(variant_id.to_string()));
    }

    let position: i64 = parts[1]
        .parse()
        .map_err(|_| LayoutError::InvalidVariantId(variant_id.to_string()))?;
    if !is_encodable_position(position) {
        return Err(LayoutError::InvalidVariantId(variant_id.to_string()));
    }
    let xpos = compute_xpos(parts[0], position)
        .ok_or_else(|| LayoutError::UnknownContig(parts[0].to_string()))?;

    Ok(VariantId {
        contig: normalize_contig(parts[0]),
        position,
        ref_allele: parts[2].to_string(),
        alt_allele: parts[3].to_string(),
        xpos,
    })
}

/// Closed genomic interval on one chromosome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn xpos_range(&self) -> LayoutResult<(i64, i64)> {
        let start = compute_xpos(&self.contig, self.start)
            .ok_or_else(|| LayoutError::UnknownContig(self.contig.clone()))?;
        let end = compute_xpos(&self.contig, self.end)
            .ok_or_else(|| LayoutError::UnknownContig(self.contig.clone()))?;
        Ok((start, end))
    }

    pub fn contains(&self, contig: &str, position: i64) -> bool {
        normalize_contig(contig) == self.contig && position >= self.start && position <= self.end
    }
}

/// Parse `"chr1:100-200"` or `"1:100-200"`
pub fn parse_interval(interval: &str) -> LayoutResult<Interval> {
    let (contig, range) = interval.split_once(':').ok_or_else(|| {
        LayoutError::invalid_interval(format!(
            "'{}'. Expected chr:start-end",
            interval
        ))
    })?;
    let (start, end) = range.split_once('-').ok_or_else(|| {
        LayoutError::invalid_interval(format!(
            "invalid range in '{}'. Expected start-end",
            interval
        ))
    })?;

    let start: i64 = start.trim().replace(',', "").parse().map_err(|_| {
        LayoutError::invalid_interval(format!("invalid start position: {}", start))
    })?;
    let end: i64 = end.trim().replace(',', "").parse().map_err(|_| {
        LayoutError::invalid_interval(format!("invalid end position: {}", end))
    })?;
    if !is_encodable_position(start) || !is_encodable_position(end) {
        return Err(LayoutError::invalid_interval(format!(
            "positions must lie in [0, {}), got {}-{}",
            XPOS_CONTIG_FACTOR, start, end
        )));
    }
    if start > end {
        return Err(LayoutError::invalid_interval(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    if contig_number(contig).is_none() {
        return Err(LayoutError::UnknownContig(contig.to_string()));
    }

    Ok(Interval {
        contig: normalize_contig(contig),
        start,
        end,
    })
}
