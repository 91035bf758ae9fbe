use std::collections::HashSet;
use std::path::Path;

use crate::input::InputError;
use crate::input::gz::{next_line, open_maybe_gz};

/// One barcode per line; the first tab-separated field is used.
pub fn parse_barcodes(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut barcodes = Vec::new();
    let mut seen = HashSet::new();
    let mut line_no = 0usize;

    while next_line(reader.as_mut(), &mut buf, path, &mut line_no)? {
        let barcode = buf.split('\t').next().unwrap_or_default().trim().to_string();
        if !seen.insert(barcode.clone()) {
            return Err(InputError::parse(
                path,
                format!("duplicate barcode {} at line {}", barcode, line_no),
            ));
        }
        barcodes.push(barcode);
    }

    if barcodes.is_empty() {
        return Err(InputError::parse(path, "barcodes file is empty"));
    }

    Ok(barcodes)
}
