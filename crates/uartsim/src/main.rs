use uartsim_common::ConsoleSink;

fn main() {
    env_logger::init();

    let config = match uartsim::cli::parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut sink = ConsoleSink::new(stdout.lock());
    match uartsim::run(&config, &mut sink) {
        Ok(stats) => log::info!(
            "{} ticks, {} start edges, {} bytes, {} framing errors",
            stats.ticks,
            stats.start_edges,
            stats.bytes,
            stats.framing_errors
        ),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}
