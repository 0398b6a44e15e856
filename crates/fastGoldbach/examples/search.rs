//! fastGoldbach Search Examples
//!
//! This example demonstrates features specific to `fastGoldbach`:
//! - Parallel execution using `rayon`
//! - Choosing a work-group size per backend
//! - Checking the parallel answer against the serial reference backend

use fastGoldbach::prelude::*;
use std::time::Instant;

fn main() -> Result<(), GoldbachError> {
    println!("{}", "=".repeat(80));
    println!("fastGoldbach Search Examples");
    println!("{}", "=".repeat(80));
    println!();

    example_1_parallel_search()?;
    example_2_work_group_size()?;
    example_3_reference_comparison()?;

    Ok(())
}

/// Example 1: Parallel Search
/// Runs both variants on the CPU pool with default settings
fn example_1_parallel_search() -> Result<(), GoldbachError> {
    println!("Example 1: Parallel Search");
    println!("{}", "-".repeat(80));

    let start = Instant::now();
    let result = Goldbach::new()
        .bound(100_000)
        .backend(CPU)
        .build()?
        .run_parallel()?;

    println!("Searched below {} in {:?}", result.effective_bound, start.elapsed());
    println!("{}", result);
    Ok(())
}

/// Example 2: Work-Group Size
/// Smaller groups change how the bound is rounded, not the answer
fn example_2_work_group_size() -> Result<(), GoldbachError> {
    println!("Example 2: Work-Group Size");
    println!("{}", "-".repeat(80));

    let search = Goldbach::new().bound(10_000).variant(Original).build()?;
    for size in [1, 7, 64, 256] {
        let result = search.run(&mut CpuBackend::new().with_work_group_size(size))?;
        println!(
            "work-group {:>4}: effective bound {:>6}, {} primes, padded to {}, counterexample {}",
            size,
            result.effective_bound,
            result.prime_count,
            result.padded_len,
            result.outcomes[0].counterexample
        );
    }

    println!();
    Ok(())
}

/// Example 3: Reference Comparison
/// The serial backend computes the same answer one work item at a time
fn example_3_reference_comparison() -> Result<(), GoldbachError> {
    println!("Example 3: Reference Comparison");
    println!("{}", "-".repeat(80));

    let search = Goldbach::new().bound(20_000).build()?;

    let start = Instant::now();
    let serial = search.run(&mut ReferenceBackend::new())?;
    let serial_time = start.elapsed();

    let start = Instant::now();
    let parallel = search.run(&mut CpuBackend::new())?;
    let parallel_time = start.elapsed();

    for variant in [Original, TwoSquare] {
        println!(
            "{:<10} serial: {:<12} parallel: {}",
            variant,
            serial.counterexample(variant).map_or(-1, |c| c.as_i64()),
            parallel.counterexample(variant).map_or(-1, |c| c.as_i64()),
        );
    }
    println!("serial {:?}, parallel {:?}", serial_time, parallel_time);

    println!();
    Ok(())
}
