use clap::{Arg, ArgAction, Command, arg};

pub const CORRELATE_CMD: &str = "correlate";

pub fn create_correlate_cli() -> Command {
    Command::new(CORRELATE_CMD)
        .about("Correlate each cluster's per-factor binding strength with per-factor read signal at nearby TSSs.")
        .arg(
            Arg::new("roster")
                .long("roster")
                .short('r')
                .help("Tab-separated factor roster: experiment, name, reads file"),
        )
        .arg(
            Arg::new("clusters")
                .long("clusters")
                .short('c')
                .help("Cluster file written by `cobind build`"),
        )
        .arg(
            Arg::new("tss")
                .long("tss")
                .short('t')
                .help("TSS list, one chr:offset[:strand] per line (`-` for stdin)"),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .value_parser(clap::value_parser!(u32))
                .help("Radius around each cluster anchor searched for TSSs"),
        )
        .arg(
            Arg::new("target-width")
                .long("target-width")
                .value_parser(clap::value_parser!(u32))
                .help("Half-width of the read-count window around each TSS"),
        )
        .arg(
            arg!(--direct "Only count cluster members that carry a motif")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(--output <output> "Report file; standard output when omitted").required(false))
        .arg(arg!(--config <config> "TOML run configuration; flags override its values").required(false))
}
