use std::collections::HashMap;

use crate::error::MarkerError;
use crate::model::counts::CountMatrix;

/// Estimated ambient ("soup") expression level per gene.
#[derive(Debug, Clone, Default)]
pub struct AmbientProfile {
    est: HashMap<String, f64>,
}

impl AmbientProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            est: pairs.into_iter().map(|(g, v)| (g.into(), v)).collect(),
        }
    }

    pub fn insert(&mut self, gene: impl Into<String>, est: f64) {
        self.est.insert(gene.into(), est);
    }

    pub fn get(&self, gene: &str) -> Option<f64> {
        self.est.get(gene).copied()
    }

    pub fn len(&self) -> usize {
        self.est.len()
    }

    pub fn is_empty(&self) -> bool {
        self.est.is_empty()
    }

    /// Resolves the estimate for every matrix row, in row order.
    ///
    /// Every gene must be present with a finite, non-negative estimate.
    pub fn aligned_to(&self, counts: &CountMatrix) -> Result<Vec<f64>, MarkerError> {
        let mut out = Vec::with_capacity(counts.n_genes());
        for gene in counts.genes() {
            let est = self
                .get(gene)
                .ok_or_else(|| MarkerError::invalid_for("missing ambient estimate", gene))?;
            if !est.is_finite() || est < 0.0 {
                return Err(MarkerError::invalid_for(
                    format!("ambient estimate {est} is not a non-negative number"),
                    gene,
                ));
            }
            out.push(est);
        }
        Ok(out)
    }
}

/// Per-cell normalisation totals used to turn raw counts into fractions.
#[derive(Debug, Clone, Default)]
pub struct CellSizeFactors {
    size: HashMap<String, f64>,
}

impl CellSizeFactors {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            size: pairs.into_iter().map(|(c, v)| (c.into(), v)).collect(),
        }
    }

    /// Size factors equal to each cell's total observed counts. Fails on the
    /// first empty barcode, as found in unfiltered 10x matrices.
    pub fn from_cell_totals(counts: &CountMatrix) -> Result<Self, MarkerError> {
        let totals = counts.cell_totals();
        if let Some((cell, _)) = counts.cells().iter().zip(&totals).find(|(_, t)| **t == 0) {
            return Err(MarkerError::invalid_for(
                "cell has no counts, so its total cannot serve as a size factor; \
                 use a filtered matrix or pass explicit size factors",
                cell.clone(),
            ));
        }
        Ok(Self::from_pairs(
            counts
                .cells()
                .iter()
                .zip(totals)
                .map(|(cell, total)| (cell.clone(), total as f64)),
        ))
    }

    pub fn get(&self, cell: &str) -> Option<f64> {
        self.size.get(cell).copied()
    }

    pub fn len(&self) -> usize {
        self.size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Resolves the size factor for every matrix column, in column order.
    pub fn aligned_to(&self, counts: &CountMatrix) -> Result<Vec<f64>, MarkerError> {
        let mut out = Vec::with_capacity(counts.n_cells());
        for cell in counts.cells() {
            let size = self
                .get(cell)
                .ok_or_else(|| MarkerError::invalid_for("missing cell size factor", cell))?;
            if !size.is_finite() || size <= 0.0 {
                return Err(MarkerError::invalid_for(
                    format!("cell size factor {size} is not strictly positive"),
                    cell,
                ));
            }
            out.push(size);
        }
        Ok(out)
    }
}
