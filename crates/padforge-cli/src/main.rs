use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use padforge_cli::{Args, ErrorAdapter, error_adapter};

/// Exit status when at least one script produced a fault record.
const EXIT_FAULTS: i32 = 2;

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting padforge");
    debug!(args:?; "Parsed arguments");

    match padforge_cli::run(&args) {
        Ok(outcome) if outcome.has_faults() => {
            for fault in outcome.faults() {
                error!("Footprint failed\n{}", fault.report());
            }
            process::exit(EXIT_FAULTS);
        }
        Ok(outcome) => {
            info!(evaluated = outcome.evaluated(); "Completed successfully");
        }
        Err(err) => {
            let report = error_adapter::render(&ErrorAdapter(&err));
            error!("Failed\n{report}");
            process::exit(1);
        }
    }
}
