use serde::{Deserialize, Serialize};
use std::fmt;

/// Gene-level p-value below which a burden result counts as evidence
pub const GENE_BURDEN_THRESHOLD: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitType {
    Variant,
    Gene,
}

impl Default for HitType {
    fn default() -> Self {
        HitType::Variant
    }
}

/// A significant variant or gene association as delivered by the data layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantHit {
    pub contig: String,
    pub position: i64,
    pub pvalue: f64,
    #[serde(default)]
    pub hit_type: HitType,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hgvsc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hgvsp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvalue_burden: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvalue_skat: Option<f64>,
}

impl SignificantHit {
    pub fn new<S: Into<String>>(contig: S, position: i64, pvalue: f64) -> Self {
        let contig = contig.into();
        let id = format!("{}-{}", contig, position);
        Self {
            label: id.clone(),
            id,
            contig,
            position,
            pvalue,
            hit_type: HitType::Variant,
            beta: None,
            gene_symbol: None,
            consequence: None,
            hgvsc: None,
            hgvsp: None,
            ac: None,
            pvalue_burden: None,
            pvalue_skat: None,
        }
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_gene<S: Into<String>>(mut self, gene_symbol: S) -> Self {
        self.gene_symbol = Some(gene_symbol.into());
        self
    }

    pub fn with_hit_type(mut self, hit_type: HitType) -> Self {
        self.hit_type = hit_type;
        self
    }
}

/// Annotation classes used by the gene burden tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BurdenSet {
    #[serde(rename = "pLoF")]
    PLoF,
    #[serde(rename = "missenseLC")]
    MissenseLC,
    #[serde(rename = "synonymous")]
    Synonymous,
}

impl BurdenSet {
    pub const ALL: [BurdenSet; 3] = [BurdenSet::PLoF, BurdenSet::MissenseLC, BurdenSet::Synonymous];

    pub fn as_str(&self) -> &'static str {
        match self {
            BurdenSet::PLoF => "pLoF",
            BurdenSet::MissenseLC => "missenseLC",
            BurdenSet::Synonymous => "synonymous",
        }
    }

    /// Parse an annotation label, case-insensitively
    pub fn from_annotation(annotation: &str) -> Option<Self> {
        BurdenSet::ALL
            .into_iter()
            .find(|set| set.as_str().eq_ignore_ascii_case(annotation))
    }
}

impl fmt::Display for BurdenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gene burden test result for one annotation class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurdenResult {
    pub annotation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvalue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvalue_burden: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvalue_skat: Option<f64>,
}

impl BurdenResult {
    /// Smallest valid p-value across SKAT-O, burden and SKAT
    pub fn min_pvalue(&self) -> Option<f64> {
        [self.pvalue, self.pvalue_burden, self.pvalue_skat]
            .into_iter()
            .flatten()
            .filter(|p| *p > 0.0 && *p <= 1.0)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn burden_set(&self) -> Option<BurdenSet> {
        BurdenSet::from_annotation(&self.annotation)
    }
}

/// A gene implicated in a locus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneInLocus {
    pub gene_symbol: String,
    #[serde(default)]
    pub gene_id: String,
    #[serde(default)]
    pub distance_kb: f64,
    #[serde(default)]
    pub coding_variant_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub burden_results: Vec<BurdenResult>,
}

impl GeneInLocus {
    pub fn new<S: Into<String>>(gene_symbol: S, distance_kb: f64) -> Self {
        Self {
            gene_symbol: gene_symbol.into(),
            gene_id: String::new(),
            distance_kb,
            coding_variant_count: 0,
            burden_results: Vec::new(),
        }
    }

    pub fn with_burden(mut self, result: BurdenResult) -> Self {
        self.burden_results.push(result);
        self
    }

    pub fn with_coding_variants(mut self, count: u32) -> Self {
        self.coding_variant_count = count;
        self
    }

    pub fn best_burden_pvalue(&self) -> Option<f64> {
        self.burden_results
            .iter()
            .filter_map(BurdenResult::min_pvalue)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn has_burden_evidence(&self) -> bool {
        self.best_burden_pvalue()
            .map_or(false, |p| p < GENE_BURDEN_THRESHOLD)
    }

    /// Annotation classes with a significant burden result, in canonical order
    pub fn significant_burden_sets(&self) -> Vec<BurdenSet> {
        let mut sets: Vec<BurdenSet> = self
            .burden_results
            .iter()
            .filter(|r| r.min_pvalue().map_or(false, |p| p < GENE_BURDEN_THRESHOLD))
            .filter_map(BurdenResult::burden_set)
            .collect();
        sets.sort();
        sets.dedup();
        sets
    }
}

/// A significant locus with its implicated genes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub contig: String,
    pub position: i64,
    pub pvalue: f64,
    #[serde(default)]
    pub genes: Vec<GeneInLocus>,
}

impl Peak {
    pub fn new<S: Into<String>>(contig: S, position: i64, pvalue: f64) -> Self {
        Self {
            contig: contig.into(),
            position,
            pvalue,
            genes: Vec::new(),
        }
    }

    pub fn with_gene(mut self, gene: GeneInLocus) -> Self {
        self.genes.push(gene);
        self
    }
}
