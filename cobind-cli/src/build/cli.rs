use clap::{Arg, ArgAction, Command, arg};

pub const BUILD_CMD: &str = "build";

pub fn create_build_cli() -> Command {
    Command::new(BUILD_CMD)
        .about("Load every factor's binding events, chain them into clusters and write the cluster file.")
        .arg(
            Arg::new("roster")
                .long("roster")
                .short('r')
                .help("Tab-separated factor roster: experiment, name, signal locator"),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .help("Directory holding one output folder per experiment"),
        )
        .arg(
            Arg::new("genome")
                .long("genome")
                .short('g')
                .help("Genome FASTA, required with --refine"),
        )
        .arg(
            arg!(--refine "Move each event to the nearest strong motif occurrence")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("window")
                .long("window")
                .value_parser(clap::value_parser!(u32))
                .help("Half-width of the refinement window"),
        )
        .arg(
            Arg::new("round")
                .long("round")
                .value_parser(clap::value_parser!(u32))
                .help("Peak-calling round whose event and PFM files are read"),
        )
        .arg(
            Arg::new("distance")
                .long("distance")
                .value_parser(clap::value_parser!(u32))
                .help("Sites closer than this chain into one cluster"),
        )
        .arg(
            Arg::new("pwm-factor")
                .long("pwm-factor")
                .value_parser(clap::value_parser!(f64))
                .help("Motif threshold as a fraction of the PWM maximum score"),
        )
        .arg(
            Arg::new("gc")
                .long("gc")
                .value_parser(clap::value_parser!(f64))
                .help("Genome GC fraction used as the PWM background"),
        )
        .arg(
            arg!(--"old-format" "Read GPS_significant event files from the old layout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"no-cache" "Read the genome through its .fai index instead of loading it into memory")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(--output <output> "Cluster file to write").required(false))
        .arg(arg!(--config <config> "TOML run configuration; flags override its values").required(false))
}
