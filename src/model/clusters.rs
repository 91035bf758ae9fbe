use std::collections::HashMap;

use crate::model::counts::CountMatrix;

/// Barcode → cluster label assignment.
#[derive(Debug, Clone, Default)]
pub struct CellClusters {
    labels: HashMap<String, String>,
}

impl CellClusters {
    pub fn from_pairs<I, C, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(c, l)| (c.into(), l.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, cell: &str) -> Option<&str> {
        self.labels.get(cell).map(String::as_str)
    }

    /// Dense cluster index per matrix column plus the cluster count. Indices
    /// follow first appearance in column order. Fails with the first
    /// unassigned cell.
    pub fn dense_indices(&self, counts: &CountMatrix) -> Result<(Vec<usize>, usize), String> {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut out = Vec::with_capacity(counts.n_cells());
        for cell in counts.cells() {
            let label = self
                .labels
                .get(cell)
                .ok_or_else(|| cell.clone())?;
            let next = ids.len();
            out.push(*ids.entry(label.as_str()).or_insert(next));
        }
        Ok((out, ids.len()))
    }
}
