use cobind_core::models::PositionWeightMatrix;
use cobind_core::traits::{MotifHit, MotifScorer};

///
/// Scans motif start positions from the middle of the sequence outward,
/// alternating right then left, and reports the first position whose forward
/// or reverse-strand score reaches the threshold. At a given position the
/// forward strand is tested first.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct OutwardScanner;

impl MotifScorer for OutwardScanner {
    fn best_hit(
        &self,
        sequence: &[u8],
        pwm: &PositionWeightMatrix,
        scan_radius: usize,
        min_score: f64,
    ) -> MotifHit {
        let len = pwm.len();
        if len == 0 || sequence.len() < len {
            return MotifHit::NoHit;
        }

        let last_start = sequence.len() - len;
        // start position that centers the motif on the sequence center
        let center = last_start / 2;

        for d in 0..=scan_radius {
            let right = Some(center + d).filter(|p| *p <= last_start);
            let left = center.checked_sub(d).filter(|_| d > 0);

            if right.is_none() && left.is_none() {
                break;
            }

            for pos in [right, left].into_iter().flatten() {
                let window = &sequence[pos..pos + len];
                if pwm.score(window).is_some_and(|s| s >= min_score) {
                    return MotifHit::Forward(pos);
                }
                if pwm.score_reverse(window).is_some_and(|s| s >= min_score) {
                    return MotifHit::Reverse(pos);
                }
            }
        }

        MotifHit::NoHit
    }
}
