use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub mod barcodes;
pub mod features;
pub mod gz;
pub mod mtx;
pub mod tables;

use barcodes::parse_barcodes;
use features::{Feature, parse_features};
use mtx::{find_matrix_path, read_mtx_triplets};

use crate::error::MarkerError;
use crate::model::counts::CountMatrix;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error in {}: {detail}", .path.display())]
    Parse { path: PathBuf, detail: String },
}

impl InputError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, detail: impl Into<String>) -> Self {
        InputError::Parse {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

/// Feature index → merged gene row. Features with an empty symbol map to
/// `None` and their counts are discarded.
#[derive(Debug, Clone)]
pub struct GeneIndex {
    pub gene_id_by_feature: Vec<Option<usize>>,
    pub symbols_by_gene_id: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TenxInput {
    /// Rows in the features file before merging and type filtering.
    pub n_features_raw: usize,
    pub counts: CountMatrix,
}

/// Loads a 10x directory (`matrix.mtx`, `features.tsv`/`genes.tsv`,
/// `barcodes.tsv`, each optionally gzipped) into a gene × cell matrix.
pub fn load_input_tenx(input_dir: &Path) -> Result<TenxInput, MarkerError> {
    let mtx_path = find_matrix_path(input_dir)?;
    let features_path = find_features_path(input_dir)?;
    let barcodes_path = find_barcodes_path(input_dir)?;

    info!(
        mtx = %mtx_path.display(),
        features = %features_path.display(),
        barcodes = %barcodes_path.display(),
        "discovered input files"
    );

    let features = parse_features(&features_path)?;
    let n_features_raw = features.len();
    let gene_index = build_gene_index(&features);

    let barcodes = parse_barcodes(&barcodes_path)?;

    let triplets = read_mtx_triplets(&mtx_path, n_features_raw, barcodes.len(), &gene_index)?;
    let counts =
        CountMatrix::from_triplets(gene_index.symbols_by_gene_id, barcodes, &triplets)?;
    info!(
        genes = counts.n_genes(),
        cells = counts.n_cells(),
        nnz = counts.nnz(),
        "count matrix loaded"
    );

    Ok(TenxInput {
        n_features_raw,
        counts,
    })
}

pub fn build_gene_index(features: &[Feature]) -> GeneIndex {
    let mut symbols_by_gene_id: Vec<String> = Vec::new();
    let mut symbol_to_gene_id: HashMap<String, usize> = HashMap::new();
    let mut gene_id_by_feature: Vec<Option<usize>> = Vec::with_capacity(features.len());

    for (idx, feature) in features.iter().enumerate() {
        if feature.symbol.is_empty() {
            gene_id_by_feature.push(None);
            continue;
        }
        if let Some(existing) = symbol_to_gene_id.get(feature.symbol.as_str()) {
            warn!(
                feature_index = idx,
                symbol = %feature.symbol,
                "duplicate gene symbol; counts merged into the first occurrence"
            );
            gene_id_by_feature.push(Some(*existing));
            continue;
        }
        let gene_id = symbols_by_gene_id.len();
        symbols_by_gene_id.push(feature.symbol.clone());
        symbol_to_gene_id.insert(feature.symbol.clone(), gene_id);
        gene_id_by_feature.push(Some(gene_id));
    }

    GeneIndex {
        gene_id_by_feature,
        symbols_by_gene_id,
    }
}

fn find_features_path(input_dir: &Path) -> Result<PathBuf, InputError> {
    let candidates = [
        "features.tsv",
        "features.tsv.gz",
        "genes.tsv",
        "genes.tsv.gz",
    ];
    for name in candidates {
        let path = input_dir.join(name);
        if path.exists() {
            return Ok(path);
        }
    }
    Err(InputError::MissingInput(format!(
        "no features.tsv(.gz) or genes.tsv(.gz) in {}",
        input_dir.display()
    )))
}

fn find_barcodes_path(input_dir: &Path) -> Result<PathBuf, InputError> {
    let candidates = ["barcodes.tsv", "barcodes.tsv.gz"];
    for name in candidates {
        let path = input_dir.join(name);
        if path.exists() {
            return Ok(path);
        }
    }
    Err(InputError::MissingInput(format!(
        "no barcodes.tsv(.gz) in {}",
        input_dir.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
