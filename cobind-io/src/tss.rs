use std::io::BufRead;

use cobind_core::errors::CobindError;
use cobind_core::models::GenomicPoint;
use cobind_core::utils::{get_dynamic_reader_w_stdin, is_skippable_line};

///
/// Parse points of interest, one per line in the first tab-separated field
/// (`chr:offset`, optionally `chr:offset:strand`).
///
/// A first data line that does not parse is taken as a column header.
///
pub fn parse_tss<R: BufRead>(reader: R) -> Result<Vec<GenomicPoint>, CobindError> {
    let mut points = Vec::new();
    let mut first = true;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable_line(&line) {
            continue;
        }

        let field = line.split('\t').next().unwrap_or_default();
        match field.parse::<GenomicPoint>() {
            Ok(point) => points.push(point),
            Err(_) if first => {}
            Err(e) => {
                return Err(CobindError::Parse(format!("TSS line {}: {}", idx + 1, e)));
            }
        }
        first = false;
    }

    Ok(points)
}

/// Read a TSS list from a path, a gzipped path or `-` for stdin.
pub fn read_tss(path: &str) -> Result<Vec<GenomicPoint>, CobindError> {
    let reader = get_dynamic_reader_w_stdin(path)
        .map_err(|e| CobindError::Io(std::io::Error::other(format!("{:#}", e))))?;
    parse_tss(reader)
}
