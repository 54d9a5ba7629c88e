use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;

use cobind_core::models::{Cluster, Site};

///
/// Chain one chromosome's sites into clusters. Sites must already be sorted
/// by position; a gap of `distance` or more closes the running cluster.
///
fn chain_sorted(sites: &[Site], distance: u32) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut run_start = 0;

    for i in 1..sites.len() {
        let gap = sites[i].coordinate.offset - sites[i - 1].coordinate.offset;
        if gap >= distance {
            clusters.extend(Cluster::from_sites(&sites[run_start..i]));
            run_start = i;
        }
    }
    clusters.extend(Cluster::from_sites(&sites[run_start..]));

    clusters
}

///
/// Single-linkage clustering of sites pooled across factors.
///
/// Sites are grouped per chromosome and each group is sorted and chained
/// independently (in parallel). Clusters come back ordered by chromosome name,
/// then by coordinate.
///
pub fn find_clusters(sites: &[Site], distance: u32) -> Vec<Cluster> {
    let mut by_chr: BTreeMap<&str, Vec<Site>> = BTreeMap::new();
    for site in sites {
        by_chr
            .entry(site.coordinate.chr.as_str())
            .or_default()
            .push(site.clone());
    }

    let groups: Vec<(&str, Vec<Site>)> = by_chr.into_iter().collect();

    let per_chr: Vec<Vec<Cluster>> = groups
        .into_par_iter()
        .map(|(chr, mut group)| {
            group.sort_by(|a, b| a.cmp_position(b));
            let clusters = chain_sorted(&group, distance);
            debug!("{}: {} sites in {} clusters", chr, group.len(), clusters.len());
            clusters
        })
        .collect();

    per_chr.into_iter().flatten().collect()
}
