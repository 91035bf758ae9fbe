use statrs::distribution::{DiscreteCDF, Poisson};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::MarkerError;
use crate::model::clusters::CellClusters;
use crate::model::counts::CountMatrix;
use crate::model::membership::MembershipMatrix;
use crate::model::params::PoissonOracleParams;
use crate::pipeline::stage1_shortlist::Shortlist;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("gene {0} is not in the count matrix")]
    UnknownGene(String),
    #[error("cell {0} has no cluster assignment")]
    UnassignedCell(String),
    #[error("invalid oracle parameters: {0}")]
    InvalidParams(String),
    #[error("poisson model for gene {gene}: {detail}")]
    Distribution { gene: String, detail: String },
    #[error("{0}")]
    Other(String),
}

/// Read-only view of the validated inputs handed to an oracle.
#[derive(Debug, Clone, Copy)]
pub struct OracleContext<'a> {
    pub counts: &'a CountMatrix,
    /// Ambient estimate per matrix row.
    pub est: &'a [f64],
    /// Size factor per matrix column.
    pub size_factors: &'a [f64],
}

/// Decides, per gene, which cells show no evidence of expressing it beyond
/// the ambient background.
pub trait NonExpressingOracle {
    fn name(&self) -> &'static str;

    /// Returns a cells × `genes` membership matrix with columns in `genes`
    /// order.
    fn classify(
        &self,
        ctx: &OracleContext<'_>,
        genes: &[String],
    ) -> Result<MembershipMatrix, OracleError>;
}

/// Flags a cell as non-expressing for a gene unless its count is
/// significantly above a Poisson ambient expectation.
///
/// The expectation is `est × size × maximum_contamination`. P-values are
/// Benjamini–Hochberg adjusted jointly over every gene × cell test. With
/// clusters, one significant cell disqualifies its whole cluster for that
/// gene.
#[derive(Debug, Clone, Default)]
pub struct PoissonOracle {
    pub params: PoissonOracleParams,
    pub clusters: Option<CellClusters>,
}

impl PoissonOracle {
    pub fn new(params: PoissonOracleParams, clusters: Option<CellClusters>) -> Self {
        Self { params, clusters }
    }
}

impl NonExpressingOracle for PoissonOracle {
    fn name(&self) -> &'static str {
        "poisson"
    }

    fn classify(
        &self,
        ctx: &OracleContext<'_>,
        genes: &[String],
    ) -> Result<MembershipMatrix, OracleError> {
        self.params
            .validate()
            .map_err(|e| OracleError::InvalidParams(e.to_string()))?;
        let n_cells = ctx.counts.n_cells();

        // Only nonzero counts can be significant; zeros have p = 1.
        let mut tests: Vec<(usize, u32)> = Vec::new();
        let mut p_values: Vec<f64> = Vec::new();
        for (j, name) in genes.iter().enumerate() {
            let gene = ctx
                .counts
                .gene_index(name)
                .ok_or_else(|| OracleError::UnknownGene(name.clone()))?;
            let est = ctx.est[gene];
            for &(cell, count) in ctx.counts.row(gene) {
                let lambda =
                    est * ctx.size_factors[cell as usize] * self.params.maximum_contamination;
                let p = upper_tail(lambda, count).map_err(|detail| OracleError::Distribution {
                    gene: name.clone(),
                    detail,
                })?;
                tests.push((j, cell));
                p_values.push(p);
            }
        }

        let q_values = benjamini_hochberg_sparse(&p_values, genes.len() * n_cells);

        let mut expressing: Vec<Vec<u32>> = vec![Vec::new(); genes.len()];
        for (&(j, cell), &q) in tests.iter().zip(&q_values) {
            if q < self.params.fdr {
                expressing[j].push(cell);
            }
        }
        debug!(
            tests = tests.len(),
            significant = expressing.iter().map(Vec::len).sum::<usize>(),
            "poisson oracle tests evaluated"
        );

        let mut membership = MembershipMatrix::new(n_cells, genes.to_vec());
        match &self.clusters {
            None => {
                for (j, cells) in expressing.iter().enumerate() {
                    for cell in 0..n_cells {
                        membership.set(cell, j, true);
                    }
                    for &cell in cells {
                        membership.set(cell as usize, j, false);
                    }
                }
            }
            Some(clusters) => {
                let (cluster_of, n_clusters) = clusters
                    .dense_indices(ctx.counts)
                    .map_err(OracleError::UnassignedCell)?;
                for (j, cells) in expressing.iter().enumerate() {
                    let mut excluded = vec![false; n_clusters];
                    for &cell in cells {
                        excluded[cluster_of[cell as usize]] = true;
                    }
                    for (cell, &cluster) in cluster_of.iter().enumerate() {
                        membership.set(cell, j, !excluded[cluster]);
                    }
                }
            }
        }
        Ok(membership)
    }
}

/// `P(X >= count)` for `X ~ Poisson(lambda)`.
fn upper_tail(lambda: f64, count: u64) -> Result<f64, String> {
    if count == 0 {
        return Ok(1.0);
    }
    if lambda <= 0.0 {
        return Ok(0.0);
    }
    let dist = Poisson::new(lambda).map_err(|e| e.to_string())?;
    Ok(dist.sf(count - 1))
}

/// Benjamini–Hochberg adjustment over `total` tests of which only `p_values`
/// are explicit; the remaining `total - p_values.len()` tests have p = 1.
pub fn benjamini_hochberg_sparse(p_values: &[f64], total: usize) -> Vec<f64> {
    let k = p_values.len();
    if k == 0 {
        return Vec::new();
    }
    let total = total.max(k) as f64;

    let mut indices: Vec<usize> = (0..k).collect();
    indices.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; k];
    // Implicit p = 1 tests rank after every explicit one and adjust to 1.
    let mut prev = 1.0f64;
    for i in (0..k).rev() {
        let rank = (i + 1) as f64;
        let adj = (p_values[indices[i]] * total / rank).min(prev);
        adjusted[indices[i]] = adj;
        prev = adj;
    }
    adjusted
}

/// Result of gating the shortlist with the oracle.
#[derive(Debug, Clone)]
pub struct OracleOutcome {
    pub survivors: Shortlist,
    pub dropped: Vec<String>,
}

/// Queries the oracle for the shortlist and keeps genes whose membership
/// column has at least one non-expressing cell.
pub fn query_oracle(
    oracle: &dyn NonExpressingOracle,
    ctx: &OracleContext<'_>,
    shortlist: &Shortlist,
) -> Result<OracleOutcome, MarkerError> {
    let membership = oracle
        .classify(ctx, &shortlist.names)
        .map_err(|e| MarkerError::OracleFailure(format!("{}: {e}", oracle.name())))?;

    if membership.n_cells() != ctx.counts.n_cells() {
        return Err(MarkerError::OracleFailure(format!(
            "{} returned {} cells, expected {}",
            oracle.name(),
            membership.n_cells(),
            ctx.counts.n_cells()
        )));
    }
    if membership.genes() != shortlist.names.as_slice() {
        return Err(MarkerError::OracleFailure(format!(
            "{} returned {} gene columns not matching the {} requested",
            oracle.name(),
            membership.n_genes(),
            shortlist.len()
        )));
    }

    let mut gene_ids = Vec::new();
    let mut names = Vec::new();
    let mut dropped = Vec::new();
    for (j, (&gene, name)) in shortlist.gene_ids.iter().zip(&shortlist.names).enumerate() {
        let non_expressing = membership.count_in_column(j);
        debug!(gene = %name, non_expressing, "oracle column");
        if non_expressing > 0 {
            gene_ids.push(gene);
            names.push(name.clone());
        } else {
            dropped.push(name.clone());
        }
    }
    info!(
        oracle = oracle.name(),
        kept = gene_ids.len(),
        dropped = dropped.len(),
        "oracle membership resolved"
    );

    Ok(OracleOutcome {
        survivors: Shortlist { gene_ids, names },
        dropped,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_oracle.rs"]
mod tests;
