use std::io::BufRead;
use std::path::Path;

use cobind_core::errors::CobindError;
use cobind_core::models::PositionWeightMatrix;
use cobind_core::utils::open_reader;

///
/// Parse the first motif of a position frequency matrix file.
///
/// `DE`, `#` and `>` lines are headers (a `DE` line also names the motif), `XX`
/// ends the motif. Every other line is one position: four counts in `A C G T`
/// order, optionally preceded by a position index and followed by a consensus letter.
///
pub fn parse_pfm<R: BufRead>(reader: R, gc: f64) -> Result<PositionWeightMatrix, CobindError> {
    let mut name = String::from("motif");
    let mut counts: Vec<[f64; 4]> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("XX") {
            if counts.is_empty() {
                continue;
            }
            break;
        }
        if let Some(rest) = trimmed.strip_prefix("DE") {
            if let Some(de_name) = rest.split_whitespace().next() {
                name = de_name.to_string();
            }
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with('>') {
            continue;
        }

        let numbers: Vec<f64> = trimmed
            .split_whitespace()
            .map_while(|tok| tok.parse::<f64>().ok())
            .collect();

        let column = match numbers.len() {
            4 => [numbers[0], numbers[1], numbers[2], numbers[3]],
            5 => [numbers[1], numbers[2], numbers[3], numbers[4]],
            n => {
                return Err(CobindError::Parse(format!(
                    "PFM line {}: expected 4 counts, found {} numbers",
                    idx + 1,
                    n
                )));
            }
        };

        if column.iter().any(|c| *c < 0.0 || !c.is_finite()) {
            return Err(CobindError::Parse(format!(
                "PFM line {}: counts must be finite and non-negative",
                idx + 1
            )));
        }

        counts.push(column);
    }

    PositionWeightMatrix::from_counts(&name, &counts, gc)
}

/// Load a PFM file and convert it to log-odds weights against a GC background.
pub fn read_pfm(path: &Path, gc: f64) -> Result<PositionWeightMatrix, CobindError> {
    let reader = open_reader(path)?;
    parse_pfm(reader, gc)
}
