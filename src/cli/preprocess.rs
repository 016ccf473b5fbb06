//! `xcorrprep preprocess` — run the intake loop + worker pool against a scan
//! source for a real invocation. Real instrument-format parsing is out of
//! scope (§2), so the demo scan source stands in for it here.

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use xcorrprep::buffer_pool::BufferPool;
use xcorrprep::config::Config;
use xcorrprep::demo::DemoScanSource;
use xcorrprep::intake::run_intake_loop;
use xcorrprep::shared_state::{ErrorSink, MaxFragmentCharge, ResultQueue};
use xcorrprep::worker_pool::WorkerPool;

/// Run a full preprocessing pass over `input`'s implied scan count.
pub fn run(
    input: PathBuf,
    config_path: Option<PathBuf>,
    threads: Option<usize>,
    batch_size: Option<usize>,
) -> Result<()> {
    let mut config = Config::load(config_path.as_deref()).context("failed to load config")?;
    if let Some(threads) = threads {
        config.num_threads = threads;
    }
    if let Some(batch_size) = batch_size {
        config.spectrum_batch_size = batch_size;
    }
    config.validate().context("invalid configuration")?;
    let config = Arc::new(config);

    info!(
        "preprocess: {} threads, buffer pool slot size {}, activation filter {:?}, analysis type {:?}",
        config.num_threads,
        config.max_array_size(),
        config.activation_method,
        config.analysis_type
    );

    let scan_count = read_scan_count_hint(&input)?;

    let pool = BufferPool::new(config.num_threads, config.max_array_size());
    let results = ResultQueue::new();
    let max_fragment_charge = MaxFragmentCharge::new();
    let errors = ErrorSink::new();

    let started = Instant::now();
    let workers = WorkerPool::new(
        Arc::clone(&config),
        pool,
        results.clone(),
        max_fragment_charge.clone(),
        errors.clone(),
    );

    let mut source = DemoScanSource::new(scan_count);
    let summary = run_intake_loop(&mut source, &config, &workers, &results, &errors, config.first_scan.max(1))
        .context("intake loop failed")?;
    workers.wait_all();

    if let Some(message) = errors.message() {
        anyhow::bail!("preprocessing failed: {message}");
    }

    println!("input: {}", input.display());
    println!("scans dispatched: {}", summary.total_scans);
    println!("queries produced:  {}", results.len());
    println!("max fragment charge observed: {}", max_fragment_charge.get());
    println!("elapsed: {:.3}s", started.elapsed().as_secs_f64());

    Ok(())
}

/// This crate has no real-format reader (§2); the input path's byte length
/// stands in for a scan count so `preprocess` has something deterministic to
/// run against without a real instrument file.
fn read_scan_count_hint(input: &PathBuf) -> Result<i32> {
    if let Ok(metadata) = std::fs::metadata(input) {
        let scans = (metadata.len() / 1024).clamp(1, 10_000) as i32;
        return Ok(scans);
    }
    Ok(100)
}
