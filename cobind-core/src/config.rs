use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::CobindError;

pub const DEFAULT_DISTANCE: u32 = 50;
pub const DEFAULT_RANGE: u32 = 1000;
pub const DEFAULT_PWM_FACTOR: f64 = 0.6;
pub const DEFAULT_GC: f64 = 0.42;
pub const DEFAULT_ROUND: u32 = 2;
pub const DEFAULT_WINDOW: u32 = 20;
pub const DEFAULT_TARGET_WIDTH: u32 = 250;
pub const DEFAULT_CLUSTER_FILE: &str = "TF_clusters.txt";

///
/// Settings for a run. Loaded from an optional TOML file and then overridden
/// by command line flags; every field has a default so a partial file is fine.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// factor roster (experiment, name, signal locator)
    pub roster: Option<PathBuf>,
    /// directory holding one output folder per experiment
    pub dir: PathBuf,
    /// genome FASTA, required only when refining
    pub genome: Option<PathBuf>,
    pub tss: Option<PathBuf>,
    /// cluster file read by `correlate`
    pub clusters: Option<PathBuf>,
    /// cluster file written by `build`
    pub cluster_output: Option<PathBuf>,
    /// correlation report; standard output when unset
    pub report: Option<PathBuf>,

    /// sites closer than this chain into one cluster
    pub distance: u32,
    /// radius around a cluster anchor searched for targets
    pub range: u32,
    /// motif threshold as a fraction of the PWM max score
    pub pwm_factor: f64,
    pub gc: f64,
    /// peak-calling round used to locate event and PFM files
    pub round: u32,
    /// half-width of the refinement window (also the scan radius)
    pub window: u32,
    pub refine: bool,
    pub direct_only: bool,
    pub old_format: bool,
    pub use_cache: bool,
    /// half-width of the lookup window around each target
    pub target_width: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            roster: None,
            dir: PathBuf::from("."),
            genome: None,
            tss: None,
            clusters: None,
            cluster_output: None,
            report: None,
            distance: DEFAULT_DISTANCE,
            range: DEFAULT_RANGE,
            pwm_factor: DEFAULT_PWM_FACTOR,
            gc: DEFAULT_GC,
            round: DEFAULT_ROUND,
            window: DEFAULT_WINDOW,
            refine: false,
            direct_only: false,
            old_format: false,
            use_cache: true,
            target_width: DEFAULT_TARGET_WIDTH,
        }
    }
}

impl TryFrom<&Path> for RunConfig {
    type Error = CobindError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path).map_err(|e| {
            CobindError::Configuration(format!("can't read config file {:?}: {}", path, e))
        })?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

impl RunConfig {
    pub fn roster_path(&self) -> Result<&Path, CobindError> {
        self.roster
            .as_deref()
            .ok_or_else(|| CobindError::Configuration("no factor roster provided".to_string()))
    }

    ///
    /// Check everything the clustering run needs before any file is touched.
    ///
    pub fn validate_for_build(&self) -> Result<(), CobindError> {
        self.roster_path()?;

        if self.distance == 0 {
            return Err(CobindError::Configuration(
                "distance must be positive".to_string(),
            ));
        }

        if self.refine {
            if self.genome.is_none() {
                return Err(CobindError::Configuration(
                    "motif refinement requires a genome FASTA".to_string(),
                ));
            }
            if self.window == 0 {
                return Err(CobindError::Configuration(
                    "refinement window must be positive".to_string(),
                ));
            }
            if !(self.pwm_factor > 0.0 && self.pwm_factor <= 1.0) {
                return Err(CobindError::Configuration(format!(
                    "pwm_factor must be in (0, 1], got {}",
                    self.pwm_factor
                )));
            }
            if !(self.gc > 0.0 && self.gc < 1.0) {
                return Err(CobindError::Configuration(format!(
                    "gc must be in (0, 1), got {}",
                    self.gc
                )));
            }
        }

        Ok(())
    }

    ///
    /// Check everything the correlation run needs before any file is touched.
    ///
    pub fn validate_for_correlate(&self) -> Result<(), CobindError> {
        self.roster_path()?;

        if self.tss.is_none() {
            return Err(CobindError::Configuration(
                "no TSS file provided".to_string(),
            ));
        }
        let Some(clusters) = self.clusters.as_deref() else {
            return Err(CobindError::Configuration(
                "no cluster file provided".to_string(),
            ));
        };
        if self.report.as_deref() == Some(clusters) {
            return Err(CobindError::Configuration(format!(
                "report file {:?} would overwrite the cluster file",
                clusters
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "roster = \"expts.txt\"\ndistance = 80\nrefine = true\n").unwrap();

        let config = RunConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.roster, Some(PathBuf::from("expts.txt")));
        assert_eq!(config.distance, 80);
        assert_eq!(config.refine, true);
        assert_eq!(config.range, DEFAULT_RANGE);
        assert_eq!(config.use_cache, true);
    }

    #[rstest]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "distanse = 80\n").unwrap();

        assert!(matches!(
            RunConfig::try_from(path.as_path()),
            Err(CobindError::Toml(_))
        ));
    }

    #[rstest]
    fn test_build_requires_roster() {
        let config = RunConfig::default();
        assert!(matches!(
            config.validate_for_build(),
            Err(CobindError::Configuration(_))
        ));
    }

    #[rstest]
    fn test_refine_requires_genome() {
        let config = RunConfig {
            roster: Some(PathBuf::from("expts.txt")),
            refine: true,
            ..Default::default()
        };
        assert!(config.validate_for_build().is_err());

        let config = RunConfig {
            genome: Some(PathBuf::from("mm9.fa")),
            ..config
        };
        assert!(config.validate_for_build().is_ok());
    }

    #[rstest]
    fn test_correlate_requires_inputs() {
        let config = RunConfig {
            roster: Some(PathBuf::from("expts.txt")),
            tss: Some(PathBuf::from("tss.txt")),
            ..Default::default()
        };
        assert!(config.validate_for_correlate().is_err());

        let config = RunConfig {
            clusters: Some(PathBuf::from("TF_clusters.txt")),
            ..config
        };
        assert!(config.validate_for_correlate().is_ok());
    }

    #[rstest]
    fn test_report_must_not_replace_cluster_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            "roster = \"expts.txt\"\ntss = \"tss.txt\"\nclusters = \"TF_clusters.txt\"\ncluster_output = \"TF_clusters.txt\"\nreport = \"TF_clusters.txt\"\n",
        )
        .unwrap();

        let config = RunConfig::try_from(path.as_path()).unwrap();
        assert!(matches!(
            config.validate_for_correlate(),
            Err(CobindError::Configuration(_))
        ));

        // the build output may name the same file the correlation reads
        let config = RunConfig {
            report: Some(PathBuf::from("report.tsv")),
            ..config
        };
        assert!(config.validate_for_correlate().is_ok());
    }
}
