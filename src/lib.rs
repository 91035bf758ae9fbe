//! Scoring and ranking of ambient-RNA marker gene candidates.
//!
//! Given a sparse gene × cell count matrix, an ambient ("soup") profile and
//! per-cell size factors, [`pipeline::rank_marker_candidates`] shortlists the
//! most ambient-abundant genes, asks a [`pipeline::stage2_oracle::NonExpressingOracle`]
//! which cells do not express each of them, and ranks the survivors by how
//! their observed expression deviates from the ambient rate.

pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::MarkerError;
pub use model::clusters::CellClusters;
pub use model::counts::CountMatrix;
pub use model::membership::MembershipMatrix;
pub use model::params::{MarkerParams, PoissonOracleParams};
pub use model::profiles::{AmbientProfile, CellSizeFactors};
pub use model::scores::{GeneScore, MarkerTable};
pub use pipeline::stage2_oracle::{NonExpressingOracle, OracleContext, OracleError, PoissonOracle};
pub use pipeline::{MarkerInputs, MarkerRun, rank_marker_candidates};
