use std::path::Path;

use tracing::warn;

use crate::input::InputError;
use crate::input::gz::{next_line, open_maybe_gz};

#[derive(Debug, Clone)]
pub struct Feature {
    pub symbol: String,
    pub feature_type: Option<String>,
}

/// Parses a v2 (`id\tsymbol`) or v3 (`id\tsymbol\ttype`) features file.
///
/// Only `Gene Expression` rows are kept as genes when a type column is
/// present; other feature types get an empty symbol and are ignored
/// downstream.
pub fn parse_features(path: &Path) -> Result<Vec<Feature>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut features = Vec::new();
    let mut line_no = 0usize;
    let mut skipped_other_types = 0usize;

    while next_line(reader.as_mut(), &mut buf, path, &mut line_no)? {
        let cols: Vec<&str> = buf.trim_end().split('\t').collect();
        if cols.len() < 2 {
            return Err(InputError::parse(
                path,
                format!("line {} has fewer than 2 columns", line_no),
            ));
        }
        let feature_type = cols.get(2).map(|t| t.trim().to_string());
        let mut symbol = normalize_symbol(cols[1]);
        if feature_type
            .as_deref()
            .is_some_and(|t| t != "Gene Expression")
        {
            skipped_other_types += 1;
            symbol.clear();
        }
        features.push(Feature {
            symbol,
            feature_type,
        });
    }

    if features.is_empty() {
        return Err(InputError::parse(path, "features file is empty"));
    }
    if skipped_other_types > 0 {
        warn!(
            count = skipped_other_types,
            "non gene-expression features ignored"
        );
    }

    Ok(features)
}

/// Trims whitespace and strips an Ensembl version suffix (`ENSG0001.12`).
/// Case is preserved so names match ambient profiles exported elsewhere.
pub fn normalize_symbol(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((left, right)) = trimmed.rsplit_once('.') {
        if left.to_ascii_uppercase().starts_with("ENS")
            && !right.is_empty()
            && right.chars().all(|c| c.is_ascii_digit())
        {
            return left.to_string();
        }
    }
    trimmed.to_string()
}
