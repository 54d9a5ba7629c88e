//! The two top-level operations: build the cluster file, and correlate clusters
//! with TSS signal.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::info;

use cobind_core::config::{DEFAULT_CLUSTER_FILE, RunConfig};
use cobind_core::errors::CobindError;
use cobind_core::models::{Cluster, FactorRoster, Site};
use cobind_core::traits::SignalStore;
use cobind_io::reads::resolve_locator;
use cobind_io::{ReadHitStore, open_sequence_provider, read_clusters, read_tss, write_clusters};

use crate::cluster::find_clusters;
use crate::correlate::{CorrelationOptions, CorrelationSummary, TssIndex, correlate_clusters};
use crate::loader::{EventLoader, LoaderOptions, missing_event_files};
use crate::stores::OpenStores;

impl From<&RunConfig> for CorrelationOptions {
    fn from(config: &RunConfig) -> Self {
        CorrelationOptions {
            range: config.range,
            target_width: config.target_width,
            direct_only: config.direct_only,
        }
    }
}

///
/// Load every factor's events (refining them when configured), chain them into
/// clusters and write the cluster file. Returns the clusters written.
///
pub fn build_clusters(config: &RunConfig) -> Result<Vec<Cluster>, CobindError> {
    config.validate_for_build()?;

    let roster = FactorRoster::try_from(config.roster_path()?)?;
    info!("Loaded roster with {} factors", roster.len());

    let options = LoaderOptions::from(config);
    // event files are checked up front so a missing one fails before the genome is loaded
    if let Some((factor, path)) = missing_event_files(&roster, &options).into_iter().next() {
        return Err(CobindError::MissingInputFile {
            factor,
            path,
            reason: "event file not found".to_string(),
        });
    }

    let mut loader = EventLoader::new(options);
    if let Some(genome) = config.genome.as_deref().filter(|_| config.refine) {
        info!("Opening genome {:?} (cached: {})", genome, config.use_cache);
        loader = loader.with_sequences(open_sequence_provider(genome, config.use_cache)?);
    }

    let sites: Vec<Site> = loader.load_all(&roster)?.into_iter().flatten().collect();
    info!("Loaded {} binding sites", sites.len());

    let clusters = find_clusters(&sites, config.distance);
    info!(
        "Built {} clusters with distance threshold {}",
        clusters.len(),
        config.distance
    );

    let output = config
        .cluster_output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CLUSTER_FILE));
    let mut writer = BufWriter::new(File::create(&output)?);
    write_clusters(&mut writer, &clusters, &roster)?;
    info!("Wrote clusters to {:?}", output);

    Ok(clusters)
}

/// Everything a correlation run reads, loaded before any report output is opened.
struct CorrelationInputs {
    clusters: Vec<Cluster>,
    tss: TssIndex,
    stores: OpenStores<ReadHitStore>,
}

fn load_correlation_inputs(config: &RunConfig) -> Result<CorrelationInputs, CobindError> {
    config.validate_for_correlate()?;

    let roster_path = config.roster_path()?;
    let roster = FactorRoster::try_from(roster_path)?;

    let (Some(cluster_path), Some(tss_path)) = (config.clusters.as_deref(), config.tss.as_deref()) else {
        return Err(CobindError::Configuration(
            "correlation needs both a cluster file and a TSS file".to_string(),
        ));
    };

    let clusters = read_clusters(cluster_path)?;
    info!("Loaded {} clusters from {:?}", clusters.len(), cluster_path);

    let tss = TssIndex::new(&read_tss(&tss_path.to_string_lossy())?);
    info!("Loaded {} TSS points from {:?}", tss.len(), tss_path);

    let base = roster_path.parent();
    let stores = OpenStores::open_all(&roster, |factor| {
        let path = resolve_locator(&factor.signal_locator, base);
        ReadHitStore::open(&path).map_err(|e| CobindError::MissingInputFile {
            factor: factor.name.clone(),
            path,
            reason: e.to_string(),
        })
    })?;

    Ok(CorrelationInputs { clusters, tss, stores })
}

fn run_correlation<S: SignalStore, W: Write>(
    clusters: &[Cluster],
    tss: &TssIndex,
    stores: OpenStores<S>,
    config: &RunConfig,
    out: &mut W,
) -> Result<CorrelationSummary, CobindError> {
    let summary = correlate_clusters(clusters, tss, &stores, &CorrelationOptions::from(config), out);
    stores.release();

    let summary = summary?;
    out.flush()?;
    Ok(summary)
}

///
/// Correlate persisted clusters with the read signal at nearby TSSs, writing the
/// report to `out`.
///
pub fn correlate<W: Write>(config: &RunConfig, out: &mut W) -> Result<CorrelationSummary, CobindError> {
    let inputs = load_correlation_inputs(config)?;
    run_correlation(&inputs.clusters, &inputs.tss, inputs.stores, config, out)
}

///
/// [correlate] into `config.report`, or standard output when no report is set.
/// The report file is created only after every input has been read.
///
pub fn correlate_to_report(config: &RunConfig) -> Result<CorrelationSummary, CobindError> {
    let inputs = load_correlation_inputs(config)?;

    match config.report.as_deref() {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            let summary = run_correlation(&inputs.clusters, &inputs.tss, inputs.stores, config, &mut out)?;
            info!("Wrote correlation report to {:?}", path);
            Ok(summary)
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            run_correlation(&inputs.clusters, &inputs.tss, inputs.stores, config, &mut out)
        }
    }
}
