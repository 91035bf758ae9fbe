use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::MarkerError;

/// Sparse non-negative gene × cell count matrix.
///
/// Storage is gene-major: each gene keeps its structurally nonzero
/// `(cell, count)` pairs in ascending cell order. Absent entries are zero.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    genes: Vec<String>,
    cells: Vec<String>,
    rows: Vec<Vec<(u32, u64)>>,
    gene_lookup: HashMap<String, usize>,
}

impl CountMatrix {
    /// Builds a matrix from `(gene_idx, cell_idx, count)` triplets.
    ///
    /// Explicit zeros are dropped and repeated coordinates are summed.
    pub fn from_triplets(
        genes: Vec<String>,
        cells: Vec<String>,
        entries: &[(usize, usize, i64)],
    ) -> Result<Self, MarkerError> {
        if genes.is_empty() {
            return Err(MarkerError::invalid("count matrix has zero rows"));
        }
        if cells.is_empty() {
            return Err(MarkerError::invalid("count matrix has zero columns"));
        }

        let mut gene_lookup = HashMap::with_capacity(genes.len());
        for (idx, gene) in genes.iter().enumerate() {
            if gene_lookup.insert(gene.clone(), idx).is_some() {
                return Err(MarkerError::invalid_for("duplicate gene name", gene));
            }
        }
        let mut seen_cells = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen_cells.insert(cell.as_str()) {
                return Err(MarkerError::invalid_for("duplicate cell identifier", cell));
            }
        }

        let mut per_row: Vec<BTreeMap<u32, u64>> = vec![BTreeMap::new(); genes.len()];
        for &(gene, cell, count) in entries {
            if gene >= genes.len() {
                return Err(MarkerError::invalid(format!(
                    "gene index {gene} out of range ({} genes)",
                    genes.len()
                )));
            }
            if cell >= cells.len() {
                return Err(MarkerError::invalid(format!(
                    "cell index {cell} out of range ({} cells)",
                    cells.len()
                )));
            }
            if count < 0 {
                return Err(MarkerError::invalid_for(
                    format!("negative count {count} for gene {}", genes[gene]),
                    &cells[cell],
                ));
            }
            if count == 0 {
                continue;
            }
            *per_row[gene].entry(cell as u32).or_insert(0) += count as u64;
        }

        let rows = per_row
            .into_iter()
            .map(|map| map.into_iter().collect::<Vec<_>>())
            .collect();

        Ok(Self {
            genes,
            cells,
            rows,
            gene_lookup,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn gene_index(&self, name: &str) -> Option<usize> {
        self.gene_lookup.get(name).copied()
    }

    /// Nonzero entries of one gene, ascending by cell.
    pub fn row(&self, gene: usize) -> &[(u32, u64)] {
        &self.rows[gene]
    }

    /// Iterates genes in row order, each with its nonzero entries. Every call
    /// starts a fresh pass.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[(u32, u64)])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(gene, row)| (gene, row.as_slice()))
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Total counts per cell (nUMIs).
    pub fn cell_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.cells.len()];
        for row in &self.rows {
            for &(cell, count) in row {
                totals[cell as usize] += count;
            }
        }
        totals
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/counts.rs"]
mod tests;
