/// Cells × genes boolean matrix: `(cell, gene)` is true when the cell counts
/// as non-expressing for that gene. Stored column-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipMatrix {
    n_cells: usize,
    genes: Vec<String>,
    values: Vec<bool>,
}

impl MembershipMatrix {
    pub fn new(n_cells: usize, genes: Vec<String>) -> Self {
        let values = vec![false; n_cells * genes.len()];
        Self {
            n_cells,
            genes,
            values,
        }
    }

    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn set(&mut self, cell: usize, gene: usize, value: bool) {
        self.values[gene * self.n_cells + cell] = value;
    }

    pub fn get(&self, cell: usize, gene: usize) -> bool {
        self.values[gene * self.n_cells + cell]
    }

    pub fn column(&self, gene: usize) -> &[bool] {
        let start = gene * self.n_cells;
        &self.values[start..start + self.n_cells]
    }

    pub fn count_in_column(&self, gene: usize) -> usize {
        self.column(gene).iter().filter(|&&v| v).count()
    }
}
