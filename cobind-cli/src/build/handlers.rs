use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cobind_core::config::RunConfig;
use cobind_spatial::build_clusters;

use crate::config::{base_config, override_flag, override_path, override_value};

pub fn build_config(matches: &ArgMatches) -> Result<RunConfig> {
    let mut config = base_config(matches)?;

    override_path(&mut config.roster, matches, "roster");
    override_path(&mut config.genome, matches, "genome");
    override_path(&mut config.cluster_output, matches, "output");
    if let Some(dir) = matches.get_one::<String>("dir") {
        config.dir = dir.into();
    }

    override_value(&mut config.window, matches, "window");
    override_value(&mut config.round, matches, "round");
    override_value(&mut config.distance, matches, "distance");
    override_value(&mut config.pwm_factor, matches, "pwm-factor");
    override_value(&mut config.gc, matches, "gc");

    override_flag(&mut config.refine, matches, "refine");
    override_flag(&mut config.old_format, matches, "old-format");
    if matches.get_flag("no-cache") {
        config.use_cache = false;
    }

    Ok(config)
}

pub fn run_build(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches)?;

    let clusters = build_clusters(&config).context("Failed to build clusters")?;
    info!("Done: {} clusters", clusters.len());

    Ok(())
}
