use crate::model::counts::CountMatrix;

/// Genes with the highest ambient estimate, in descending-estimate order.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortlist {
    pub gene_ids: Vec<usize>,
    pub names: Vec<String>,
}

impl Shortlist {
    pub fn len(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_ids.is_empty()
    }
}

/// Ranks genes by `est` (descending, ties by row order), keeps the top
/// `cap`, then drops those with a zero estimate.
///
/// `est` must already be aligned to the matrix rows.
pub fn shortlist_candidates(counts: &CountMatrix, est: &[f64], cap: usize) -> Shortlist {
    let mut order: Vec<usize> = (0..counts.n_genes()).collect();
    order.sort_by(|&a, &b| est[b].total_cmp(&est[a]));
    order.truncate(cap);
    order.retain(|&g| est[g] > 0.0);

    let names = order.iter().map(|&g| counts.genes()[g].clone()).collect();
    Shortlist {
        gene_ids: order,
        names,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_shortlist.rs"]
mod tests;
