use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use fastGoldbach::prelude::*;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::args::Args;

const SUCCESS: ExitCode = ExitCode::SUCCESS;
const FAILURE: ExitCode = ExitCode::FAILURE;

/// Same status clap uses for malformed arguments.
const USAGE: u8 = 2;

mod args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(&args) {
        Ok(()) => SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            exit_code(&err)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let search = args.search()?;
    let result = search.run_parallel()?;
    println!("{result}");
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<GoldbachError>() {
        Some(err) if err.is_usage_error() => ExitCode::from(USAGE),
        _ => FAILURE,
    }
}
