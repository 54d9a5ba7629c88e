use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cobind_core::config::RunConfig;
use cobind_spatial::correlate_to_report;

use crate::config::{base_config, override_flag, override_path, override_value};

pub fn correlate_config(matches: &ArgMatches) -> Result<RunConfig> {
    let mut config = base_config(matches)?;

    override_path(&mut config.roster, matches, "roster");
    override_path(&mut config.clusters, matches, "clusters");
    override_path(&mut config.tss, matches, "tss");
    override_path(&mut config.report, matches, "output");

    override_value(&mut config.range, matches, "range");
    override_value(&mut config.target_width, matches, "target-width");
    override_flag(&mut config.direct_only, matches, "direct");

    Ok(config)
}

pub fn run_correlate(matches: &ArgMatches) -> Result<()> {
    let config = correlate_config(matches)?;

    let summary = correlate_to_report(&config).context("Failed to correlate clusters with TSS signal")?;
    info!("Done: {} correlation records", summary.records);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::cli::create_correlate_cli;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    const CLUSTER_FILE: &str = "#Region\tLength\t#Sites\tTFs\tTFIDs\tSignals\tMotifs\t#Motif\n\
chr1:1000-1040\t41\t3\tA,B,C\t0,1,2\t10,20,5\t1,1,1\t3\n";

    fn matches(args: &[&str]) -> ArgMatches {
        create_correlate_cli()
            .try_get_matches_from(std::iter::once("correlate").chain(args.iter().copied()))
            .unwrap()
    }

    /// Roster, reads, TSS list and a one-cluster file in `dir`.
    fn write_run(dir: &Path) {
        fs::write(
            dir.join("roster.tsv"),
            "A\tA\tA.bed\nB\tB\tB.bed\nC\tC\tC.bed\n",
        )
        .unwrap();
        for (name, n_reads) in [("A", 2), ("B", 4), ("C", 1)] {
            let body: String = (0..n_reads).map(|i| format!("chr1\t{}\t{}\n", 1400 + i, 1436 + i)).collect();
            fs::write(dir.join(format!("{}.bed", name)), body).unwrap();
        }
        fs::write(dir.join("tss.txt"), "chr1:1500\n").unwrap();
        fs::write(dir.join("TF_clusters.txt"), CLUSTER_FILE).unwrap();
    }

    fn write_config(dir: &Path, report: &str) -> PathBuf {
        let path = dir.join("run.toml");
        let toml = format!(
            "roster = {:?}\ntss = {:?}\nclusters = {:?}\ncluster_output = {:?}\nreport = {:?}\n",
            dir.join("roster.tsv"),
            dir.join("tss.txt"),
            dir.join("TF_clusters.txt"),
            dir.join("TF_clusters.txt"),
            dir.join(report),
        );
        fs::write(&path, toml).unwrap();
        path
    }

    #[rstest]
    fn test_flags_are_applied() {
        let config = correlate_config(&matches(&[
            "--roster",
            "factors.tsv",
            "--clusters",
            "TF_clusters.txt",
            "--tss",
            "tss.txt",
            "--range",
            "2000",
            "--output",
            "report.tsv",
            "--direct",
        ]))
        .unwrap();

        assert_eq!(config.roster, Some(PathBuf::from("factors.tsv")));
        assert_eq!(config.clusters, Some(PathBuf::from("TF_clusters.txt")));
        assert_eq!(config.tss, Some(PathBuf::from("tss.txt")));
        assert_eq!(config.report, Some(PathBuf::from("report.tsv")));
        assert_eq!(config.cluster_output, None);
        assert_eq!(config.range, 2000);
        assert_eq!(config.target_width, 250);
        assert!(config.direct_only);
        assert!(config.validate_for_correlate().is_ok());
    }

    #[rstest]
    fn test_missing_tss_fails_validation() {
        let config = correlate_config(&matches(&["--roster", "f.tsv", "--clusters", "c.txt"])).unwrap();
        assert!(config.validate_for_correlate().is_err());
    }

    #[rstest]
    fn test_shared_config_keeps_cluster_file() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path());
        let config = write_config(dir.path(), "report.tsv");

        run_correlate(&matches(&["--config", config.to_str().unwrap()])).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("TF_clusters.txt")).unwrap(), CLUSTER_FILE);
        assert_eq!(
            fs::read_to_string(dir.path().join("report.tsv")).unwrap(),
            "#Cluster\tAnchor\tTarget\tOffset\t#TFs\tCorr\nchr1:1000-1040\tchr1:1020\tchr1:1500\t480\t3\t1.00\n"
        );
    }

    #[rstest]
    fn test_report_over_cluster_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path());
        let config = write_config(dir.path(), "TF_clusters.txt");

        assert!(run_correlate(&matches(&["--config", config.to_str().unwrap()])).is_err());
        assert_eq!(fs::read_to_string(dir.path().join("TF_clusters.txt")).unwrap(), CLUSTER_FILE);
    }

    #[rstest]
    fn test_output_flag_over_cluster_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path());
        let clusters = dir.path().join("TF_clusters.txt");
        let clusters = clusters.to_str().unwrap();
        let roster = dir.path().join("roster.tsv");
        let tss = dir.path().join("tss.txt");

        let result = run_correlate(&matches(&[
            "--roster",
            roster.to_str().unwrap(),
            "--tss",
            tss.to_str().unwrap(),
            "--clusters",
            clusters,
            "--output",
            clusters,
        ]));

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(clusters).unwrap(), CLUSTER_FILE);
    }
}
