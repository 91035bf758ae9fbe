use thiserror::Error;

use crate::input::InputError;

/// Failure kinds of a marker ranking run. No partial table is ever returned
/// alongside an error.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("invalid input: {what}{}", fmt_id(.id))]
    InvalidInput { what: String, id: Option<String> },

    #[error("oracle failure: {0}")]
    OracleFailure(String),

    #[error("numeric invariant violated: ratio {value} for gene {gene}, cell {cell}")]
    NumericInvariantViolation {
        gene: String,
        cell: String,
        value: f64,
    },

    #[error(transparent)]
    Input(#[from] InputError),
}

impl MarkerError {
    pub fn invalid(what: impl Into<String>) -> Self {
        MarkerError::InvalidInput {
            what: what.into(),
            id: None,
        }
    }

    pub fn invalid_for(what: impl Into<String>, id: impl Into<String>) -> Self {
        MarkerError::InvalidInput {
            what: what.into(),
            id: Some(id.into()),
        }
    }
}

fn fmt_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" ({id})"),
        None => String::new(),
    }
}
