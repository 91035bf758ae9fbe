use tracing::debug;

use crate::error::MarkerError;
use crate::model::counts::CountMatrix;

/// Sparse ratios of observed fraction to ambient estimate, grouped by gene.
///
/// Only structurally nonzero counts have an entry; an absent entry is an
/// implicit match to the ambient rate and never enters any statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioMatrix {
    /// `(gene_id, [(cell, ratio)])`, genes in ascending row order, cells
    /// ascending within each gene.
    pub rows: Vec<(usize, Vec<(u32, f64)>)>,
}

impl RatioMatrix {
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn row(&self, gene: usize) -> Option<&[(u32, f64)]> {
        self.rows
            .iter()
            .find(|(g, _)| *g == gene)
            .map(|(_, r)| r.as_slice())
    }
}

/// Computes `(count / size) / est` for every nonzero count of the given
/// genes. Genes without a positive estimate are skipped, never divided.
pub fn compute_ratios(
    counts: &CountMatrix,
    est: &[f64],
    size_factors: &[f64],
    genes: &[usize],
) -> Result<RatioMatrix, MarkerError> {
    let mut ordered = genes.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let mut rows = Vec::with_capacity(ordered.len());
    for gene in ordered {
        let gene_est = est[gene];
        if !(gene_est > 0.0) {
            continue;
        }
        let entries = counts.row(gene);
        let mut out = Vec::with_capacity(entries.len());
        for &(cell, count) in entries {
            let ratio = (count as f64 / size_factors[cell as usize]) / gene_est;
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(MarkerError::NumericInvariantViolation {
                    gene: counts.genes()[gene].clone(),
                    cell: counts.cells()[cell as usize].clone(),
                    value: ratio,
                });
            }
            out.push((cell, ratio));
        }
        rows.push((gene, out));
    }

    let ratios = RatioMatrix { rows };
    debug!(
        genes = ratios.rows.len(),
        entries = ratios.nnz(),
        "ratio entries computed"
    );
    Ok(ratios)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_ratios.rs"]
mod tests;
