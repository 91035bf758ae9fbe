pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::params::{MarkerParams, PoissonOracleParams};

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub n_features_raw: usize,
    pub n_genes: usize,
    pub n_cells: usize,
    pub nnz: usize,
    pub size_factors: String,
    pub clusters: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateSummary {
    pub shortlisted: usize,
    pub oracle: String,
    pub oracle_dropped: usize,
    pub reported: usize,
    pub useful: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: String,
    pub version: String,
    pub input: InputSummary,
    pub params: MarkerParams,
    pub oracle_params: PoissonOracleParams,
    pub gates: GateSummary,
    pub top_useful: Vec<String>,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_bool(v: bool) -> &'static str {
    if v { "TRUE" } else { "FALSE" }
}
