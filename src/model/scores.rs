use serde::Serialize;

/// Fraction of expressing cells that must sit below the ambient rate for a
/// gene to be flagged useful.
pub const USEFUL_LOW_FRACTION: f64 = 0.1;

/// Summary of one gene's ratio distribution over its expressing cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneScore {
    pub gene: String,
    pub n_cells: usize,
    pub low_count: usize,
    pub low_frac: f64,
    pub extremity: f64,
    pub centrality: f64,
    pub min_frac: f64,
    pub is_useful: bool,
}

/// Ranked marker candidates, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerTable {
    pub rows: Vec<GeneScore>,
}

impl MarkerTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, gene: &str) -> Option<&GeneScore> {
        self.rows.iter().find(|r| r.gene == gene)
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.gene.as_str())
    }

    pub fn useful_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_useful).count()
    }
}
