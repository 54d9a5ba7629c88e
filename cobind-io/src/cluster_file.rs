//! Tab-separated persistence format for clusters.
//!
//! One header line, then one line per cluster:
//!
//! ```text
//! #Region  Length  #Sites  TFs  TFIDs  Signals  Motifs  #Motif
//! chr1:1000-1040  41  2  CTCF,Nanog  0,1  120,55  1,0  1
//! ```
//!
//! The four list columns are comma-joined and parallel; signals are rounded to integers.

use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use cobind_core::errors::CobindError;
use cobind_core::models::{Cluster, FactorRoster, Region};
use cobind_core::utils::{is_skippable_line, open_reader};

pub const CLUSTER_FILE_HEADER: &str = "#Region\tLength\t#Sites\tTFs\tTFIDs\tSignals\tMotifs\t#Motif";

const MIN_COLUMNS: usize = 7;

fn join<T, F>(items: &[T], f: F) -> String
where
    F: Fn(&T) -> String,
{
    items.iter().map(f).collect::<Vec<String>>().join(",")
}

///
/// Render one cluster as a line of the cluster file (no trailing newline).
///
pub fn format_cluster(cluster: &Cluster, roster: &FactorRoster) -> Result<String, CobindError> {
    let names = cluster
        .factor_ids
        .iter()
        .map(|id| {
            roster.name(*id).ok_or_else(|| {
                CobindError::Configuration(format!("factor id {} is not in the roster", id))
            })
        })
        .collect::<Result<Vec<&str>, CobindError>>()?;

    Ok(format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        cluster.region,
        cluster.region.width(),
        cluster.len(),
        names.join(","),
        join(&cluster.factor_ids, |id| id.to_string()),
        join(&cluster.signals, |s| format!("{}", s.round() as i64)),
        join(&cluster.has_motifs, |m| u8::from(*m).to_string()),
        cluster.motif_count(),
    ))
}

/// Write the header and every cluster, in order.
pub fn write_clusters<W: Write>(
    writer: &mut W,
    clusters: &[Cluster],
    roster: &FactorRoster,
) -> Result<(), CobindError> {
    writeln!(writer, "{}", CLUSTER_FILE_HEADER)?;
    for cluster in clusters {
        writeln!(writer, "{}", format_cluster(cluster, roster)?)?;
    }
    writer.flush()?;
    Ok(())
}

fn split_list<T: FromStr>(field: &str) -> Result<Vec<T>, String>
where
    T::Err: std::fmt::Display,
{
    field
        .split(',')
        .map(|item| {
            item.trim()
                .parse::<T>()
                .map_err(|e| format!("`{}`: {}", item, e))
        })
        .collect()
}

fn parse_motif_flag(flag: &str) -> Result<bool, String> {
    match flag.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(format!("motif flag `{}` is not 0 or 1", other)),
    }
}

fn parse_cluster_line(line: &str) -> Result<Cluster, String> {
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    if fields.len() < MIN_COLUMNS {
        return Err(format!(
            "expected at least {} columns, found {}",
            MIN_COLUMNS,
            fields.len()
        ));
    }

    let region = Region::from_str(fields[0]).map_err(|e| e.to_string())?;

    let width: u32 = fields[1]
        .trim()
        .parse()
        .map_err(|e| format!("length `{}`: {}", fields[1], e))?;
    if width != region.width() {
        return Err(format!(
            "length {} disagrees with region {}",
            width, region
        ));
    }

    let n_sites: usize = fields[2]
        .trim()
        .parse()
        .map_err(|e| format!("site count `{}`: {}", fields[2], e))?;

    let n_names = fields[3].split(',').count();
    let factor_ids: Vec<usize> = split_list(fields[4])?;
    let signals: Vec<f64> = split_list(fields[5])?;
    let has_motifs: Vec<bool> = fields[6]
        .split(',')
        .map(parse_motif_flag)
        .collect::<Result<_, _>>()?;

    let lens = [n_names, factor_ids.len(), signals.len(), has_motifs.len()];
    if lens.iter().any(|l| *l != n_sites) {
        return Err(format!(
            "ragged member columns: {} sites but names/ids/signals/motifs have {:?} entries",
            n_sites, lens
        ));
    }

    let cluster = Cluster {
        region,
        factor_ids,
        signals,
        has_motifs,
    };

    if let Some(total) = fields.get(7) {
        let total: usize = total
            .trim()
            .parse()
            .map_err(|e| format!("motif count `{}`: {}", total, e))?;
        if total != cluster.motif_count() {
            return Err(format!(
                "motif count {} disagrees with {} motif flags set",
                total,
                cluster.motif_count()
            ));
        }
    }

    Ok(cluster)
}

///
/// Parse clusters back in file order. `#` and blank lines are skipped. Any
/// inconsistent line fails the whole file; nothing is silently dropped.
///
pub fn parse_clusters<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Cluster>, CobindError> {
    let mut clusters = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable_line(&line) {
            continue;
        }

        let cluster =
            parse_cluster_line(&line).map_err(|reason| CobindError::MalformedPersistedCluster {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            })?;
        clusters.push(cluster);
    }

    Ok(clusters)
}

pub fn read_clusters(path: &Path) -> Result<Vec<Cluster>, CobindError> {
    let reader = open_reader(path)?;
    parse_clusters(reader, path)
}
