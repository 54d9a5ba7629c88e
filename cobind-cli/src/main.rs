mod build;
mod config;
mod correlate;

use anyhow::Result;
use clap::{ArgAction, Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "cobind";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Cluster co-bound transcription factor binding sites and correlate cluster strength with signal at nearby TSSs.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log per-factor and per-chromosome detail")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build::cli::create_build_cli())
        .subcommand(correlate::cli::create_correlate_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag("verbose"));
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match matches.subcommand() {
        //
        // BUILD CLUSTERS
        //
        Some((build::cli::BUILD_CMD, matches)) => {
            build::handlers::run_build(matches)?;
        }

        //
        // CORRELATE WITH TSS
        //
        Some((correlate::cli::CORRELATE_CMD, matches)) => {
            correlate::handlers::run_correlate(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["cobind", "-v", "correlate", "--roster", "r.tsv", "--clusters", "c.txt", "--tss", "t.txt"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }
}
