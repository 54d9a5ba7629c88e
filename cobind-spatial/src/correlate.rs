use std::fmt::{self, Display};
use std::io::Write;

use fxhash::FxHashMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use cobind_core::errors::CobindError;
use cobind_core::models::{Cluster, GenomicPoint};
use cobind_core::traits::SignalStore;

use crate::stores::OpenStores;

/// Correlation needs at least this many distinct factors in a cluster.
pub const MIN_FACTORS: usize = 3;

pub const REPORT_HEADER: &str = "#Cluster\tAnchor\tTarget\tOffset\t#TFs\tCorr";

///
/// Sorted TSS offsets per chromosome for window queries around cluster anchors.
///
#[derive(Debug, Default)]
pub struct TssIndex {
    points: FxHashMap<String, Vec<u32>>,
}

impl TssIndex {
    pub fn new(points: &[GenomicPoint]) -> Self {
        let mut index: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        for p in points {
            index.entry(p.chr.clone()).or_default().push(p.offset);
        }
        for offsets in index.values_mut() {
            offsets.sort_unstable();
        }
        TssIndex { points: index }
    }

    pub fn len(&self) -> usize {
        self.points.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Every TSS on the anchor's chromosome with `|tss - anchor| <= range`,
    /// in ascending coordinate order.
    ///
    pub fn within_window(&self, anchor: &GenomicPoint, range: u32) -> Vec<GenomicPoint> {
        let Some(offsets) = self.points.get(&anchor.chr) else {
            return Vec::new();
        };

        let lo = anchor.offset.saturating_sub(range);
        let hi = anchor.offset.saturating_add(range);
        let first = offsets.partition_point(|o| *o < lo);
        let last = offsets.partition_point(|o| *o <= hi);

        offsets[first..last]
            .iter()
            .map(|o| GenomicPoint::new(anchor.chr.clone(), *o))
            .collect()
    }
}

///
/// Pearson correlation coefficient of two equally long vectors.
/// Zero variance in either vector (or fewer than two points) gives 0.0.
///
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x[..n].iter().zip(y[..n].iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRecord {
    pub cluster: String,
    pub anchor: GenomicPoint,
    pub target: GenomicPoint,
    pub offset: i64,
    pub n_factors: usize,
    pub coefficient: f64,
}

impl Display for CorrelationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{:.2}",
            self.cluster, self.anchor, self.target, self.offset, self.n_factors, self.coefficient
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationOptions {
    /// Search radius around each cluster anchor.
    pub range: u32,
    /// Half-width of the signal window around each target.
    pub target_width: u32,
    pub direct_only: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorrelationSummary {
    pub clusters: usize,
    pub targets: usize,
    pub records: usize,
    pub skipped_few_factors: usize,
    pub lookup_failures: usize,
}

impl Display for CorrelationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} clusters, {} targets, {} records, {} skipped (< {} factors), {} lookup failures",
            self.clusters,
            self.targets,
            self.records,
            self.skipped_few_factors,
            MIN_FACTORS,
            self.lookup_failures
        )
    }
}

///
/// Per-factor target-signal vector, or the first lookup failure.
///
fn target_signals<S: SignalStore>(
    factors: &[usize],
    target: &GenomicPoint,
    stores: &OpenStores<S>,
    target_width: u32,
) -> Result<Vec<f64>, CobindError> {
    let window = target.expand(target_width);
    factors
        .iter()
        .map(|id| {
            let store = stores.get(*id).ok_or_else(|| {
                CobindError::Configuration(format!(
                    "cluster references factor #{} but only {} signal stores are open",
                    id,
                    stores.len()
                ))
            })?;
            store.count_hits(&window).map(|n| n as f64)
        })
        .collect()
}

///
/// Correlate each cluster's aggregated factor signal with the signal at every
/// TSS near its anchor, writing one report row per (cluster, target) pair.
///
/// Lookup failures drop only the affected pair; a cluster that references a
/// factor with no open store is a configuration error.
///
pub fn correlate_clusters<S: SignalStore, W: Write>(
    clusters: &[Cluster],
    tss: &TssIndex,
    stores: &OpenStores<S>,
    options: &CorrelationOptions,
    out: &mut W,
) -> Result<CorrelationSummary, CobindError> {
    let mut summary = CorrelationSummary {
        clusters: clusters.len(),
        ..Default::default()
    };

    writeln!(out, "{}", REPORT_HEADER)?;

    let bar = ProgressBar::new(clusters.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }

    for cluster in clusters {
        let anchor = cluster.anchor();
        let region = cluster.region.to_string();

        let factors = cluster.distinct_factors(options.direct_only);
        let cluster_signals: Vec<f64> = factors.iter().map(|id| cluster.summed_signal(*id)).collect();

        for target in tss.within_window(&anchor, options.range) {
            summary.targets += 1;

            if factors.len() < MIN_FACTORS {
                summary.skipped_few_factors += 1;
                continue;
            }

            let signals = match target_signals(&factors, &target, stores, options.target_width) {
                Ok(signals) => signals,
                Err(e @ CobindError::LookupFailure { .. }) => {
                    warn!("Skipping {} -> {}: {}", region, target, e);
                    summary.lookup_failures += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let record = CorrelationRecord {
                cluster: region.clone(),
                anchor: anchor.clone(),
                offset: target.offset_from(&anchor),
                target,
                n_factors: factors.len(),
                coefficient: pearson(&cluster_signals, &signals),
            };
            writeln!(out, "{}", record)?;
            summary.records += 1;
        }

        bar.inc(1);
    }

    bar.finish_and_clear();
    info!("Correlation summary: {}", summary);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobind_core::models::{Factor, FactorRoster, Region, Site};
    use pretty_assertions::assert_eq;
    use rstest::*;

    /// Returns a fixed count, or a lookup failure for windows covering `fails_at`.
    struct FixedStore {
        name: String,
        count: u64,
        fails_at: Option<u32>,
    }

    impl SignalStore for FixedStore {
        fn count_hits(&self, region: &Region) -> Result<u64, CobindError> {
            match self.fails_at {
                Some(pos) if region.start <= pos && pos <= region.end => Err(CobindError::LookupFailure {
                    source_name: self.name.clone(),
                    region: region.to_string(),
                    reason: "backend unavailable".to_string(),
                }),
                _ => Ok(self.count),
            }
        }

        fn close(&mut self) {}
    }

    fn roster() -> FactorRoster {
        FactorRoster {
            factors: ["A", "B", "C"]
                .iter()
                .map(|n| Factor {
                    experiment: n.to_string(),
                    name: n.to_string(),
                    signal_locator: format!("{}.bed", n),
                })
                .collect(),
        }
    }

    fn stores_failing(counts: [u64; 3], failing: Option<(usize, u32)>) -> OpenStores<FixedStore> {
        OpenStores::open_all(&roster(), |f| {
            let id = roster().factors.iter().position(|g| g == f).unwrap_or(0);
            Ok(FixedStore {
                name: f.name.clone(),
                count: counts[id],
                fails_at: failing.filter(|(factor, _)| *factor == id).map(|(_, pos)| pos),
            })
        })
        .unwrap()
    }

    fn stores(counts: [u64; 3]) -> OpenStores<FixedStore> {
        stores_failing(counts, None)
    }

    fn site(factor_id: usize, offset: u32, signal: f64, has_motif: bool) -> Site {
        Site {
            factor_id,
            coordinate: GenomicPoint::new("chr1", offset),
            signal,
            has_motif,
        }
    }

    /// A:10, B:20, C:5 with C lacking a motif; anchor chr1:1020
    #[fixture]
    fn cluster() -> Cluster {
        Cluster::from_sites(&[
            site(0, 1000, 10.0, true),
            site(1, 1020, 20.0, true),
            site(2, 1040, 5.0, false),
        ])
        .unwrap()
    }

    fn options(direct_only: bool) -> CorrelationOptions {
        CorrelationOptions {
            range: 1000,
            target_width: 250,
            direct_only,
        }
    }

    #[rstest]
    fn test_window_search_is_inclusive_and_sorted() {
        let index = TssIndex::new(&[
            GenomicPoint::new("chr1", 3000),
            GenomicPoint::new("chr1", 2020),
            GenomicPoint::new("chr1", 20),
            GenomicPoint::new("chr1", 19),
            GenomicPoint::new("chr2", 1020),
        ]);
        let hits = index.within_window(&GenomicPoint::new("chr1", 1020), 1000);
        assert_eq!(
            hits,
            vec![GenomicPoint::new("chr1", 20), GenomicPoint::new("chr1", 2020)]
        );
        assert_eq!(index.len(), 5);
        assert!(index.within_window(&GenomicPoint::new("chr3", 1), 1000).is_empty());
    }

    #[rstest]
    #[case(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], 1.0)]
    #[case(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0], -1.0)]
    #[case(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0], 0.0)]
    #[case(&[4.0], &[1.0], 0.0)]
    fn test_pearson(#[case] x: &[f64], #[case] y: &[f64], #[case] expected: f64) {
        assert!((pearson(x, y) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn test_three_factors_retained(cluster: Cluster) {
        let index = TssIndex::new(&[GenomicPoint::new("chr1", 1500)]);
        let mut out = Vec::new();

        let summary = correlate_clusters(
            &[cluster],
            &index,
            &stores([2, 4, 1]),
            &options(false),
            &mut out,
        )
        .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\nchr1:1000-1040\tchr1:1020\tchr1:1500\t480\t3\t1.00\n", REPORT_HEADER)
        );
    }

    #[rstest]
    fn test_direct_only_drops_below_three(cluster: Cluster) {
        let index = TssIndex::new(&[GenomicPoint::new("chr1", 1500)]);
        let mut out = Vec::new();

        let summary = correlate_clusters(
            &[cluster],
            &index,
            &stores([2, 4, 1]),
            &options(true),
            &mut out,
        )
        .unwrap();

        assert_eq!(summary.records, 0);
        assert_eq!(summary.skipped_few_factors, 1);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", REPORT_HEADER));
    }

    #[rstest]
    fn test_lookup_failure_skips_only_that_pair(cluster: Cluster) {
        let index = TssIndex::new(&[GenomicPoint::new("chr1", 500), GenomicPoint::new("chr1", 1500)]);
        let mut out = Vec::new();

        // B's store fails only for the window around chr1:500
        let summary = correlate_clusters(
            &[cluster],
            &index,
            &stores_failing([2, 4, 1], Some((1, 500))),
            &options(false),
            &mut out,
        )
        .unwrap();

        assert_eq!(
            summary,
            CorrelationSummary {
                clusters: 1,
                targets: 2,
                records: 1,
                skipped_few_factors: 0,
                lookup_failures: 1,
            }
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\nchr1:1000-1040\tchr1:1020\tchr1:1500\t480\t3\t1.00\n", REPORT_HEADER)
        );
    }

    #[rstest]
    fn test_negative_offset_and_flat_signal(cluster: Cluster) {
        let index = TssIndex::new(&[GenomicPoint::new("chr1", 520)]);
        let mut out = Vec::new();

        correlate_clusters(
            &[cluster],
            &index,
            &stores([7, 7, 7]),
            &options(false),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("chr1:1000-1040\tchr1:1020\tchr1:520\t-500\t3\t0.00")
        );
    }

    #[rstest]
    fn test_unknown_factor_is_configuration_error() {
        let cluster = Cluster::from_sites(&[
            site(0, 1000, 1.0, true),
            site(1, 1010, 2.0, true),
            site(7, 1020, 3.0, true),
        ])
        .unwrap();
        let index = TssIndex::new(&[GenomicPoint::new("chr1", 1010)]);
        let mut out = Vec::new();

        let result = correlate_clusters(
            &[cluster],
            &index,
            &stores([1, 1, 1]),
            &options(false),
            &mut out,
        );
        assert!(matches!(result, Err(CobindError::Configuration(_))));
    }
}
