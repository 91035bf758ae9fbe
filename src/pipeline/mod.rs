pub mod stage1_shortlist;
pub mod stage2_oracle;
pub mod stage3_ratios;
pub mod stage4_rank;
pub mod stage5_report;

use tracing::info;

use crate::error::MarkerError;
use crate::model::counts::CountMatrix;
use crate::model::params::MarkerParams;
use crate::model::profiles::{AmbientProfile, CellSizeFactors};
use crate::model::scores::MarkerTable;
use stage1_shortlist::{Shortlist, shortlist_candidates};
use stage2_oracle::{NonExpressingOracle, OracleContext, query_oracle};
use stage3_ratios::compute_ratios;
use stage4_rank::aggregate_and_rank;

#[derive(Debug, Clone, Copy)]
pub struct MarkerInputs<'a> {
    pub counts: &'a CountMatrix,
    pub ambient: &'a AmbientProfile,
    pub size_factors: &'a CellSizeFactors,
}

/// Outcome of one run: the ranked table plus what each gate removed.
#[derive(Debug, Clone)]
pub struct MarkerRun {
    pub table: MarkerTable,
    pub shortlist: Shortlist,
    pub oracle_dropped: Vec<String>,
}

/// Scores and ranks ambient marker candidates.
///
/// Inputs are validated before any computation. Nothing is mutated; calling
/// twice with the same inputs and a deterministic oracle yields identical
/// tables.
pub fn rank_marker_candidates(
    inputs: &MarkerInputs<'_>,
    oracle: &dyn NonExpressingOracle,
    params: &MarkerParams,
) -> Result<MarkerRun, MarkerError> {
    params.validate()?;
    let counts = inputs.counts;
    if counts.n_genes() == 0 {
        return Err(MarkerError::invalid("count matrix has zero rows"));
    }
    let est = inputs.ambient.aligned_to(counts)?;
    let size_factors = inputs.size_factors.aligned_to(counts)?;

    let shortlist = shortlist_candidates(counts, &est, params.max_candidates);
    info!(
        genes = counts.n_genes(),
        cells = counts.n_cells(),
        shortlisted = shortlist.len(),
        "candidate shortlist built"
    );

    let ctx = OracleContext {
        counts,
        est: &est,
        size_factors: &size_factors,
    };
    let outcome = query_oracle(oracle, &ctx, &shortlist)?;

    let ratios = compute_ratios(counts, &est, &size_factors, &shortlist.gene_ids)?;
    let table = aggregate_and_rank(counts, &ratios, &outcome.survivors)?;

    Ok(MarkerRun {
        table,
        shortlist,
        oracle_dropped: outcome.dropped,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
