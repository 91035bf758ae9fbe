use std::path::{Path, PathBuf};

use crate::input::gz::{next_line, open_maybe_gz};
use crate::input::{GeneIndex, InputError};

pub fn find_matrix_path(input_dir: &Path) -> Result<PathBuf, InputError> {
    let plain = input_dir.join("matrix.mtx");
    if plain.exists() {
        return Ok(plain);
    }
    let gz = input_dir.join("matrix.mtx.gz");
    if gz.exists() {
        return Ok(gz);
    }
    Err(InputError::MissingInput(format!(
        "no matrix.mtx(.gz) in {}",
        input_dir.display()
    )))
}

/// Reads a MatrixMarket coordinate file (features × barcodes, 1-based) into
/// zero-based `(gene_id, cell, count)` triplets, remapping features through
/// `gene_index`. Zero values and unmapped features are skipped; negative
/// values are passed through for the matrix builder to reject.
pub fn read_mtx_triplets(
    path: &Path,
    n_features_raw: usize,
    n_cells: usize,
    gene_index: &GeneIndex,
) -> Result<Vec<(usize, usize, i64)>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut line_no = 0usize;

    if !next_line(reader.as_mut(), &mut buf, path, &mut line_no)? {
        return Err(InputError::parse(path, "matrix file is empty"));
    }
    let header = buf.trim_end();
    if !header.starts_with("%%MatrixMarket") {
        return Err(InputError::parse(path, "missing MatrixMarket header"));
    }
    if !header.contains("coordinate") {
        return Err(InputError::parse(path, "only coordinate matrices are supported"));
    }

    // Skip comments to size line
    let (rows, cols, nnz) = loop {
        if !next_line(reader.as_mut(), &mut buf, path, &mut line_no)? {
            return Err(InputError::parse(path, "missing matrix size line"));
        }
        let line = buf.trim();
        if line.starts_with('%') {
            continue;
        }
        let fields = parse_fields::<usize>(line, path, line_no)?;
        break (fields[0], fields[1], fields[2]);
    };

    if rows != n_features_raw {
        return Err(InputError::InvalidInput(format!(
            "matrix row count {} does not match features {}",
            rows, n_features_raw
        )));
    }
    if cols != n_cells {
        return Err(InputError::InvalidInput(format!(
            "matrix column count {} does not match barcodes {}",
            cols, n_cells
        )));
    }

    let mut triplets = Vec::with_capacity(nnz);
    while next_line(reader.as_mut(), &mut buf, path, &mut line_no)? {
        let line = buf.trim();
        if line.starts_with('%') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(row_raw), Some(col_raw), Some(val_raw)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(InputError::parse(
                path,
                format!("invalid matrix entry at line {}", line_no),
            ));
        };
        let row = parse_index(row_raw, rows, path, line_no)?;
        let col = parse_index(col_raw, cols, path, line_no)?;
        let val = parse_count(val_raw, path, line_no)?;
        if val == 0 {
            continue;
        }
        if let Some(gene_id) = gene_index.gene_id_by_feature.get(row).and_then(|v| *v) {
            triplets.push((gene_id, col, val));
        }
    }

    Ok(triplets)
}

fn parse_fields<T: std::str::FromStr>(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<[T; 3], InputError> {
    let mut parts = line.split_whitespace().map(|p| p.parse::<T>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b)), Some(Ok(c))) => Ok([a, b, c]),
        _ => Err(InputError::parse(
            path,
            format!("invalid matrix size line at line {}", line_no),
        )),
    }
}

/// 1-based index in `1..=bound`, returned zero-based.
fn parse_index(raw: &str, bound: usize, path: &Path, line_no: usize) -> Result<usize, InputError> {
    match raw.parse::<usize>() {
        Ok(v) if v >= 1 && v <= bound => Ok(v - 1),
        _ => Err(InputError::parse(
            path,
            format!("matrix index {} out of bounds at line {}", raw, line_no),
        )),
    }
}

/// Integer count; real-valued files are accepted when the value is integral.
fn parse_count(raw: &str, path: &Path, line_no: usize) -> Result<i64, InputError> {
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(InputError::parse(
            path,
            format!("non-integer count {} at line {}", raw, line_no),
        )),
    }
}
