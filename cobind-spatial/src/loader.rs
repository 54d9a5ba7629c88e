//! Per-factor event loading with optional motif-based coordinate refinement.

use std::path::PathBuf;

use glob::{Pattern, glob};
use log::{debug, info, warn};

use cobind_core::config::RunConfig;
use cobind_core::errors::CobindError;
use cobind_core::models::{Factor, FactorRoster, GenomicPoint, PositionWeightMatrix, Site};
use cobind_core::traits::{MotifScorer, SequenceProvider};
use cobind_io::events::{BindingEvent, read_events};
use cobind_io::pfm::read_pfm;

use crate::motif::OutwardScanner;

/// Where to find each factor's peak calls and how to treat them.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    pub dir: PathBuf,
    pub round: u32,
    pub old_format: bool,
    pub refine: bool,
    pub window: u32,
    pub pwm_factor: f64,
    pub gc: f64,
}

impl From<&RunConfig> for LoaderOptions {
    fn from(config: &RunConfig) -> Self {
        LoaderOptions {
            dir: config.dir.clone(),
            round: config.round,
            old_format: config.old_format,
            refine: config.refine,
            window: config.window,
            pwm_factor: config.pwm_factor,
            gc: config.gc,
        }
    }
}

/// Event file and (if any) PFM file for one factor.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorFiles {
    pub events: PathBuf,
    pub pfm: Option<PathBuf>,
}

impl LoaderOptions {
    fn round_label(&self) -> u32 {
        if self.round >= 2 { self.round } else { 1 }
    }

    ///
    /// Output directory of one experiment: `dir/E/E_outputs`, or `dir/E` for
    /// the old GPS layout.
    ///
    pub fn factor_dir(&self, experiment: &str) -> PathBuf {
        let dir = self.dir.join(experiment);
        if self.old_format {
            dir
        } else {
            dir.join(format!("{}_outputs", experiment))
        }
    }

    ///
    /// Locate the event file and the first `E_{round}_PFM*` file of an experiment.
    ///
    pub fn locate(&self, experiment: &str) -> Result<FactorFiles, CobindError> {
        let dir = self.factor_dir(experiment);
        let round = self.round_label();

        let events_name = if self.old_format {
            format!("{}_{}_GPS_significant.txt", experiment, round)
        } else {
            format!("{}_{}_GEM_events.txt", experiment, round)
        };

        let pattern = format!(
            "{}/{}_{}_PFM*",
            Pattern::escape(&dir.to_string_lossy()),
            Pattern::escape(experiment),
            round
        );
        let mut pfms: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| CobindError::Parse(format!("PFM pattern `{}`: {}", pattern, e)))?
            .filter_map(Result::ok)
            .collect();
        pfms.sort();

        Ok(FactorFiles {
            events: dir.join(events_name),
            pfm: pfms.into_iter().next(),
        })
    }
}

///
/// Loads every factor's binding events into [Site]s, refining coordinates to the
/// nearest strong motif when asked to and when the factor has a PWM.
///
pub struct EventLoader {
    options: LoaderOptions,
    sequences: Option<Box<dyn SequenceProvider>>,
    scorer: Box<dyn MotifScorer>,
}

impl EventLoader {
    pub fn new(options: LoaderOptions) -> Self {
        EventLoader {
            options,
            sequences: None,
            scorer: Box::new(OutwardScanner),
        }
    }

    pub fn with_sequences(mut self, sequences: Box<dyn SequenceProvider>) -> Self {
        self.sequences = Some(sequences);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn MotifScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    fn load_pwm(&self, factor: &Factor, files: &FactorFiles) -> Result<Option<PositionWeightMatrix>, CobindError> {
        let Some(path) = files.pfm.as_deref() else {
            let missing = CobindError::MissingOptionalInput(
                self.options
                    .factor_dir(&factor.experiment)
                    .join(format!("{}_{}_PFM*", factor.experiment, self.options.round_label())),
            );
            warn!("{} has no motif PFM file, its sites are not refined ({})", factor.name, missing);
            return Ok(None);
        };

        let pwm = read_pfm(path, self.options.gc).map_err(|e| {
            CobindError::Parse(format!("PFM file {:?} for `{}`: {}", path, factor.name, e))
        })?;
        debug!("{}: loaded {}-long motif {} from {:?}", factor.name, pwm.len(), pwm.name, path);
        Ok(Some(pwm))
    }

    fn refine(
        &mut self,
        event: &BindingEvent,
        pwm: &PositionWeightMatrix,
    ) -> Result<GenomicPoint, CobindError> {
        let sequences = self.sequences.as_mut().ok_or_else(|| {
            CobindError::Configuration("motif refinement requires a genome".to_string())
        })?;

        let window = event.coordinate.expand(self.options.window);
        let seq = sequences.fetch(&window)?;
        let min_score = pwm.max_score() * self.options.pwm_factor;

        let hit = self
            .scorer
            .best_hit(seq.as_bytes(), pwm, self.options.window as usize, min_score);

        Ok(match hit.refined_offset(window.start, pwm.len()) {
            Some(offset) => GenomicPoint::new(event.coordinate.chr.clone(), offset),
            None => event.coordinate.clone(),
        })
    }

    ///
    /// Load one factor. A missing or unreadable event file is fatal; a missing PFM
    /// only disables refinement for this factor.
    ///
    pub fn load_factor(&mut self, factor_id: usize, factor: &Factor) -> Result<Vec<Site>, CobindError> {
        let files = self.options.locate(&factor.experiment)?;

        let pwm = self.load_pwm(factor, &files)?;

        let events = read_events(&files.events).map_err(|e| CobindError::MissingInputFile {
            factor: factor.name.clone(),
            path: files.events.clone(),
            reason: e.to_string(),
        })?;

        let refine_with = pwm.filter(|_| self.options.refine);

        let mut sites = Vec::with_capacity(events.len());
        let mut n_refined = 0;
        for event in &events {
            let coordinate = match &refine_with {
                Some(pwm) => {
                    let refined = self.refine(event, pwm)?;
                    if refined != event.coordinate {
                        debug!("{}: {} -> {}", factor.name, event.coordinate, refined);
                        n_refined += 1;
                    }
                    refined
                }
                None => event.coordinate.clone(),
            };

            sites.push(Site {
                factor_id,
                coordinate,
                signal: event.strength,
                has_motif: event.has_motif,
            });
        }

        info!(
            "TF#{}: loaded {} from {:?}, n={} (moved to motif: {})",
            factor_id,
            factor.name,
            files.events,
            sites.len(),
            n_refined
        );

        Ok(sites)
    }

    ///
    /// Load every factor in roster order. The outer vector is indexed by factor id.
    ///
    pub fn load_all(&mut self, roster: &FactorRoster) -> Result<Vec<Vec<Site>>, CobindError> {
        if self.options.refine && self.sequences.is_none() {
            return Err(CobindError::Configuration(
                "motif refinement requires a genome".to_string(),
            ));
        }

        roster
            .factors
            .iter()
            .enumerate()
            .map(|(factor_id, factor)| self.load_factor(factor_id, factor))
            .collect()
    }
}

/// Factors whose event file is absent, as `(name, expected path)`.
pub fn missing_event_files(roster: &FactorRoster, options: &LoaderOptions) -> Vec<(String, PathBuf)> {
    roster
        .factors
        .iter()
        .filter_map(|f| {
            let files = options.locate(&f.experiment).ok()?;
            (!files.events.is_file()).then(|| (f.name.clone(), files.events))
        })
        .collect()
}
