use std::collections::HashSet;

use tracing::info;

use crate::error::MarkerError;
use crate::model::counts::CountMatrix;
use crate::model::scores::{GeneScore, MarkerTable, USEFUL_LOW_FRACTION};
use crate::pipeline::stage1_shortlist::Shortlist;
use crate::pipeline::stage3_ratios::RatioMatrix;

/// Reduces one gene's ratios to its score. Returns `None` when the gene has
/// no expressing cells.
///
/// Sums accumulate in the order given, which is ascending cell order for
/// rows coming out of [`crate::pipeline::stage3_ratios::compute_ratios`].
pub fn score_gene(
    counts: &CountMatrix,
    gene: usize,
    ratios: &[(u32, f64)],
) -> Result<Option<GeneScore>, MarkerError> {
    if ratios.is_empty() {
        return Ok(None);
    }

    let mut low_count = 0usize;
    let mut sum_sq = 0.0f64;
    let mut sum_central = 0.0f64;
    let mut min_ratio = f64::INFINITY;
    for &(cell, ratio) in ratios {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(MarkerError::NumericInvariantViolation {
                gene: counts.genes()[gene].clone(),
                cell: counts.cells()[cell as usize].clone(),
                value: ratio,
            });
        }
        if ratio < 1.0 {
            low_count += 1;
        }
        let lr = ratio.log10();
        let sq = lr * lr;
        sum_sq += sq;
        sum_central += 1.0 / (1.0 + sq);
        if ratio < min_ratio {
            min_ratio = ratio;
        }
    }

    let n_cells = ratios.len();
    let n = n_cells as f64;
    Ok(Some(GeneScore {
        gene: counts.genes()[gene].clone(),
        n_cells,
        low_count,
        low_frac: low_count as f64 / n,
        extremity: sum_sq / n,
        centrality: sum_central / n,
        min_frac: min_ratio.log10(),
        is_useful: low_count as f64 > USEFUL_LOW_FRACTION * n,
    }))
}

/// Stable sort: useful genes first, then by descending extremity.
pub fn rank_scores(scores: &mut [GeneScore]) {
    scores.sort_by(|a, b| {
        b.is_useful
            .cmp(&a.is_useful)
            .then_with(|| b.extremity.total_cmp(&a.extremity))
    });
}

/// Scores every gene in `ratios`, ranks them, and keeps only `survivors`.
pub fn aggregate_and_rank(
    counts: &CountMatrix,
    ratios: &RatioMatrix,
    survivors: &Shortlist,
) -> Result<MarkerTable, MarkerError> {
    let mut scores = Vec::with_capacity(ratios.rows.len());
    for (gene, row) in &ratios.rows {
        if let Some(score) = score_gene(counts, *gene, row)? {
            scores.push(score);
        }
    }
    rank_scores(&mut scores);

    let keep: HashSet<&str> = survivors.names.iter().map(String::as_str).collect();
    scores.retain(|s| keep.contains(s.gene.as_str()));

    let table = MarkerTable { rows: scores };
    info!(
        rows = table.len(),
        useful = table.useful_count(),
        "marker candidates ranked"
    );
    Ok(table)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_rank.rs"]
mod tests;
