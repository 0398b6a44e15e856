//! Checks every available parallel backend against the sequential oracle and
//! writes a JSON report.
//!
//! Usage: `cargo run -p fastGoldbach-validation [--features gpu] -- [OUTPUT]`
//! (default output: `../output/fastGoldbach/report.json`).

use fastGoldbach::prelude::*;
use goldbach::internals::evaluation::oracle::{reference_counterexample, reference_primes};
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Bounds covering tiny, rounded, around-the-answer and large searches.
const BOUNDS: [u32; 9] = [3, 10, 100, 1_000, 5_777, 5_778, 10_000, 65_537, 250_000];

#[derive(Debug, Serialize)]
struct Report {
    cases: Vec<Case>,
    mismatches: usize,
}

#[derive(Debug, Serialize)]
struct Case {
    backend: String,
    device: String,
    bound: u32,
    effective_bound: u32,
    work_group_size: u32,
    prime_count: usize,
    expected_prime_count: usize,
    variants: Vec<VariantCase>,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct VariantCase {
    variant: String,
    counterexample: i64,
    expected: i64,
    kernel_time_us: Option<u128>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(mismatches) => {
            eprintln!("{mismatches} case(s) disagree with the oracle");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<usize, Box<dyn Error>> {
    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("../output/fastGoldbach/report.json"));

    let mut cases = Vec::new();
    for &bound in &BOUNDS {
        let search = Goldbach::new().bound(bound).build()?;
        cases.push(check("cpu", &search, search.run(&mut CpuBackend::new())?));
        cases.push(check(
            "cpu-wg7",
            &search,
            search.run(&mut CpuBackend::new().with_work_group_size(7))?,
        ));

        #[cfg(feature = "gpu")]
        match search.run(&mut GpuBackend::new()) {
            Ok(result) => cases.push(check("gpu", &search, result)),
            Err(GoldbachError::DeviceUnavailable) => warn!(bound, "no GPU adapter, skipping"),
            Err(err) => return Err(err.into()),
        }
    }

    let mismatches = cases.iter().filter(|c| !c.passed).count();
    let report = Report { cases, mismatches };

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&output, serde_json::to_string_pretty(&report)?)?;
    info!(path = %output.display(), cases = report.cases.len(), mismatches, "report written");
    println!(
        "Validated {} cases, {} mismatches, report at {}",
        report.cases.len(),
        mismatches,
        output.display()
    );

    Ok(mismatches)
}

fn check(backend: &str, search: &GoldbachSearch, result: SearchResult) -> Case {
    let bound = result.effective_bound;
    let expected_prime_count = reference_primes(bound).len();

    let variants: Vec<VariantCase> = search
        .config()
        .variants
        .iter()
        .map(|&variant| {
            let counterexample = result.counterexample(variant).map_or(-1, |c| c.as_i64());
            VariantCase {
                variant: variant.to_string(),
                counterexample,
                expected: reference_counterexample(bound, variant).as_i64(),
                kernel_time_us: result
                    .outcome(variant)
                    .and_then(|o| o.kernel_time)
                    .map(|t| t.as_micros()),
            }
        })
        .collect();

    let passed = result.prime_count == expected_prime_count
        && variants.iter().all(|v| v.counterexample == v.expected);
    if !passed {
        warn!(backend, bound, "result disagrees with the oracle");
    }

    Case {
        backend: backend.to_string(),
        device: result.device().name.clone(),
        bound: result.bound,
        effective_bound: bound,
        work_group_size: result.work_group_size,
        prime_count: result.prime_count,
        expected_prime_count,
        variants,
        passed,
    }
}
