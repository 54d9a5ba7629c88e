//! Seams to the collaborators the engine consumes but does not own:
//! sequence fetch, motif scanning and quantitative-signal lookups.

use crate::errors::CobindError;
use crate::models::{PositionWeightMatrix, Region};

/// Fetch genomic sequence for a region.
pub trait SequenceProvider {
    ///
    /// Return the uppercase bases of `region`. The result starts at `region.start`;
    /// it may be shorter than the region only when the region runs past the
    /// chromosome end.
    ///
    fn fetch(&mut self, region: &Region) -> Result<String, CobindError>;
}

///
/// Outcome of a motif scan over a window. Offsets are motif start positions,
/// 0-based from the start of the scanned sequence.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotifHit {
    Forward(usize),
    Reverse(usize),
    NoHit,
}

impl MotifHit {
    ///
    /// Coordinate of the motif center given the 1-based start of the scanned window.
    ///
    /// Forward hits add `floor(len / 2)`; reverse hits add `len - 1 - floor(len / 2)`
    /// so both land on the same base of the motif as read on its own strand.
    ///
    pub fn refined_offset(&self, window_start: u32, motif_len: usize) -> Option<u32> {
        let half = motif_len / 2;
        match *self {
            MotifHit::Forward(offset) => Some(window_start + (offset + half) as u32),
            MotifHit::Reverse(offset) => {
                Some(window_start + (offset + motif_len - 1 - half) as u32)
            }
            MotifHit::NoHit => None,
        }
    }
}

pub trait MotifScorer {
    ///
    /// Find the motif occurrence nearest the center of `sequence`, searching at most
    /// `scan_radius` positions either side, whose score reaches `min_score`.
    ///
    fn best_hit(
        &self,
        sequence: &[u8],
        pwm: &PositionWeightMatrix,
        scan_radius: usize,
        min_score: f64,
    ) -> MotifHit;
}

///
/// Per-factor quantitative-signal store. Opening is the implementor's constructor;
/// `close` releases whatever the store holds and later lookups must fail.
///
pub trait SignalStore {
    fn count_hits(&self, region: &Region) -> Result<u64, CobindError>;

    fn close(&mut self);
}
