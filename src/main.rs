use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use transync::cli::{Arguments, ExitStatus};

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    let debug = args.debug;
    init_tracing(debug);

    match transync::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            if debug {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {}", err);
            }
            ExitStatus::Error.into()
        }
    }
}
