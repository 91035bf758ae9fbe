use std::collections::HashSet;
use std::path::Path;

use crate::input::InputError;
use crate::input::features::normalize_symbol;
use crate::input::gz::{next_line, open_maybe_gz};
use crate::model::clusters::CellClusters;
use crate::model::profiles::{AmbientProfile, CellSizeFactors};

/// Reads `key\tvalue` rows. A first line whose value `parse_value` rejects
/// is treated as a header.
fn read_keyed_rows<T>(
    path: &Path,
    mut parse_value: impl FnMut(&str) -> Option<T>,
    what: &str,
) -> Result<Vec<(String, T)>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut line_no = 0usize;
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut header_allowed = true;

    while next_line(reader.as_mut(), &mut buf, path, &mut line_no)? {
        let cols: Vec<&str> = buf.trim_end().split('\t').map(str::trim).collect();
        if cols.len() < 2 {
            return Err(InputError::parse(
                path,
                format!("line {} has fewer than 2 columns", line_no),
            ));
        }
        let parsed = parse_value(cols[1]);
        let first_line = std::mem::replace(&mut header_allowed, false);
        let Some(value) = parsed else {
            if first_line {
                continue;
            }
            return Err(InputError::parse(
                path,
                format!("invalid {} '{}' at line {}", what, cols[1], line_no),
            ));
        };
        let key = cols[0].to_string();
        if !seen.insert(key.clone()) {
            return Err(InputError::parse(
                path,
                format!("duplicate key {} at line {}", key, line_no),
            ));
        }
        rows.push((key, value));
    }

    if rows.is_empty() {
        return Err(InputError::parse(path, format!("no {} rows found", what)));
    }
    Ok(rows)
}

fn read_non_negative(path: &Path, what: &str) -> Result<Vec<(String, f64)>, InputError> {
    let rows = read_keyed_rows(path, |raw| raw.parse::<f64>().ok(), what)?;
    if let Some((key, value)) = rows.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
        return Err(InputError::parse(
            path,
            format!("{} for {} must be a non-negative number, got {}", what, key, value),
        ));
    }
    Ok(rows)
}

/// Ambient profile TSV: `gene\test[\t...]`, optional header. Gene names
/// are normalized like matrix symbols and must stay unique afterwards.
pub fn load_ambient_profile(path: &Path) -> Result<AmbientProfile, InputError> {
    let rows = read_non_negative(path, "ambient estimate")?;
    let mut seen = HashSet::new();
    let mut genes = Vec::with_capacity(rows.len());
    for (raw, value) in rows {
        let gene = normalize_symbol(&raw);
        if !seen.insert(gene.clone()) {
            return Err(InputError::parse(
                path,
                format!("duplicate gene {} (from {})", gene, raw),
            ));
        }
        genes.push((gene, value));
    }
    Ok(AmbientProfile::from_pairs(genes))
}

/// Size factor TSV: `barcode\tsize`, optional header. Positivity is checked
/// against the matrix later.
pub fn load_size_factors(path: &Path) -> Result<CellSizeFactors, InputError> {
    let rows = read_non_negative(path, "size factor")?;
    Ok(CellSizeFactors::from_pairs(rows))
}

/// Cluster TSV: `barcode\tcluster`. The first line is treated as a header
/// when its second field reads `cluster` (any case).
pub fn load_clusters(path: &Path) -> Result<CellClusters, InputError> {
    let mut first = true;
    let rows = read_keyed_rows(
        path,
        |raw| {
            let header = first && raw.eq_ignore_ascii_case("cluster");
            first = false;
            (!raw.is_empty() && !header).then(|| raw.to_string())
        },
        "cluster label",
    )?;
    Ok(CellClusters::from_pairs(rows))
}
