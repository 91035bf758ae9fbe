use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|e| InputError::io(path, e))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads the next non-empty line into `buf`, returning `false` at EOF.
pub fn next_line(
    reader: &mut dyn BufRead,
    buf: &mut String,
    path: &Path,
    line_no: &mut usize,
) -> Result<bool, InputError> {
    loop {
        buf.clear();
        let read = reader
            .read_line(buf)
            .map_err(|e| InputError::io(path, e))?;
        if read == 0 {
            return Ok(false);
        }
        *line_no += 1;
        if !buf.trim().is_empty() {
            return Ok(true);
        }
    }
}
