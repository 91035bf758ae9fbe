use serde::Serialize;

use crate::error::MarkerError;

pub const DEFAULT_MAX_CANDIDATES: usize = 500;

#[derive(Debug, Clone, Serialize)]
pub struct MarkerParams {
    /// Upper bound on the ambient-abundance shortlist.
    pub max_candidates: usize,
}

impl Default for MarkerParams {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl MarkerParams {
    pub fn validate(&self) -> Result<(), MarkerError> {
        if self.max_candidates == 0 {
            return Err(MarkerError::invalid("max_candidates must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PoissonOracleParams {
    /// Scales the ambient expectation; 1.0 assumes a cell could be entirely
    /// ambient.
    pub maximum_contamination: f64,
    pub fdr: f64,
}

impl Default for PoissonOracleParams {
    fn default() -> Self {
        Self {
            maximum_contamination: 1.0,
            fdr: 0.05,
        }
    }
}

impl PoissonOracleParams {
    pub fn validate(&self) -> Result<(), MarkerError> {
        if !self.maximum_contamination.is_finite() || self.maximum_contamination <= 0.0 {
            return Err(MarkerError::invalid(format!(
                "maximum_contamination must be positive, got {}",
                self.maximum_contamination
            )));
        }
        if !(self.fdr > 0.0 && self.fdr <= 1.0) {
            return Err(MarkerError::invalid(format!(
                "fdr must be in (0, 1], got {}",
                self.fdr
            )));
        }
        Ok(())
    }
}
