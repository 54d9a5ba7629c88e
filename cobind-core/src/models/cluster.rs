use std::collections::BTreeSet;

use crate::models::{GenomicPoint, Region, Site};

///
/// A maximal chain of binding sites on one chromosome, possibly from
/// several factors.
///
/// Members are stored as parallel vectors in ascending coordinate order:
/// entry `i` of `factor_ids`, `signals` and `has_motifs` describes the same site.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub region: Region,
    pub factor_ids: Vec<usize>,
    pub signals: Vec<f64>,
    pub has_motifs: Vec<bool>,
}

impl Cluster {
    ///
    /// Build a cluster from a run of sites that are already sorted by position
    /// and all sit on the same chromosome. Returns `None` for an empty run.
    ///
    pub fn from_sites(sites: &[Site]) -> Option<Cluster> {
        let first = sites.first()?;
        let last = sites.last()?;

        Some(Cluster {
            region: Region {
                chr: first.coordinate.chr.clone(),
                start: first.coordinate.offset,
                end: last.coordinate.offset,
            },
            factor_ids: sites.iter().map(|s| s.factor_id).collect(),
            signals: sites.iter().map(|s| s.signal).collect(),
            has_motifs: sites.iter().map(|s| s.has_motif).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.factor_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factor_ids.is_empty()
    }

    pub fn motif_count(&self) -> usize {
        self.has_motifs.iter().filter(|m| **m).count()
    }

    /// Midpoint of the bounding region, used as the anchor for target search.
    pub fn anchor(&self) -> GenomicPoint {
        self.region.mid_point()
    }

    ///
    /// Distinct factor ids present in the cluster, ascending.
    ///
    /// With `direct_only` set, only members carrying a motif are considered.
    ///
    pub fn distinct_factors(&self, direct_only: bool) -> Vec<usize> {
        self.factor_ids
            .iter()
            .zip(self.has_motifs.iter())
            .filter(|(_, has_motif)| !direct_only || **has_motif)
            .map(|(id, _)| *id)
            .collect::<BTreeSet<usize>>()
            .into_iter()
            .collect()
    }

    /// Sum of the signals of every member contributed by `factor_id`.
    pub fn summed_signal(&self, factor_id: usize) -> f64 {
        self.factor_ids
            .iter()
            .zip(self.signals.iter())
            .filter(|(id, _)| **id == factor_id)
            .map(|(_, signal)| *signal)
            .sum()
    }
}
