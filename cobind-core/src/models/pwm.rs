use crate::errors::CobindError;

///
/// Log-odds position weight matrix over the `ACGT` alphabet.
///
/// Each column holds the weights for A, C, G and T at one motif position.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PositionWeightMatrix {
    pub name: String,
    pub weights: Vec<[f64; 4]>,
}

fn base_to_idx(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

impl PositionWeightMatrix {
    ///
    /// Build log-odds weights from a position frequency (count) matrix.
    ///
    /// The background is derived from the genome GC fraction: `A = T = (1 - gc) / 2`
    /// and `C = G = gc / 2`. Each column is smoothed with a pseudocount equal to the
    /// background frequency, so `p = (count + bg) / (total + 1)`.
    ///
    pub fn from_counts(
        name: &str,
        counts: &[[f64; 4]],
        gc: f64,
    ) -> Result<PositionWeightMatrix, CobindError> {
        if counts.is_empty() {
            return Err(CobindError::Parse(format!("motif `{}` has no positions", name)));
        }
        if !(gc > 0.0 && gc < 1.0) {
            return Err(CobindError::Configuration(format!(
                "GC fraction must be in (0, 1), got {}",
                gc
            )));
        }

        let at = (1.0 - gc) / 2.0;
        let cg = gc / 2.0;
        let background = [at, cg, cg, at];

        let weights = counts
            .iter()
            .map(|col| {
                let total: f64 = col.iter().sum();
                let mut weights = [0.0_f64; 4];
                for i in 0..4 {
                    let p = (col[i] + background[i]) / (total + 1.0);
                    weights[i] = (p / background[i]).log2();
                }
                weights
            })
            .collect();

        Ok(PositionWeightMatrix {
            name: name.to_string(),
            weights,
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Highest achievable score: the sum of the column maxima.
    pub fn max_score(&self) -> f64 {
        self.weights
            .iter()
            .map(|col| col.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
            .sum()
    }

    ///
    /// Score a window of exactly `len()` bases on the forward strand.
    /// Returns `None` when the window has the wrong length or a non-ACGT base.
    ///
    pub fn score(&self, window: &[u8]) -> Option<f64> {
        if window.len() != self.len() {
            return None;
        }
        let mut score = 0.0_f64;
        for (col, base) in self.weights.iter().zip(window.iter()) {
            score += col[base_to_idx(*base)?];
        }
        Some(score)
    }

    /// Score the reverse complement of `window`.
    pub fn score_reverse(&self, window: &[u8]) -> Option<f64> {
        if window.len() != self.len() {
            return None;
        }
        let mut score = 0.0_f64;
        for (col, base) in self.weights.iter().zip(window.iter().rev()) {
            // complement of index i in ACGT is 3 - i
            score += col[3 - base_to_idx(*base)?];
        }
        Some(score)
    }
}
