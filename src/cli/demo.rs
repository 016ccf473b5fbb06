//! `xcorrprep demo` — run a synthetic scan stream end to end, for smoke-testing
//! without external data (§4.11).

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use xcorrprep::buffer_pool::BufferPool;
use xcorrprep::config::Config;
use xcorrprep::demo::DemoScanSource;
use xcorrprep::intake::run_intake_loop;
use xcorrprep::shared_state::{ErrorSink, MaxFragmentCharge, ResultQueue};
use xcorrprep::worker_pool::WorkerPool;

/// Generate `scan_count` synthetic spectra and preprocess them, optionally
/// writing a TOML summary to `output`.
pub fn run(scan_count: i32, output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    info!("xcorrprep demo run: generating {scan_count} synthetic scans");

    let config = Arc::new(Config::load(config_path.as_deref()).context("failed to load config")?);
    info!(
        "resolved config: {} threads, sparse_matrix_enabled={}",
        config.num_threads, config.sparse_matrix_enabled
    );

    let pool = BufferPool::new(config.num_threads, config.max_array_size());
    let results = ResultQueue::new();
    let max_fragment_charge = MaxFragmentCharge::new();
    let errors = ErrorSink::new();

    let workers = WorkerPool::new(
        Arc::clone(&config),
        pool,
        results.clone(),
        max_fragment_charge.clone(),
        errors.clone(),
    );

    let mut source = DemoScanSource::new(scan_count);
    let summary = run_intake_loop(&mut source, &config, &workers, &results, &errors, 1)
        .context("intake loop failed")?;
    workers.wait_all();

    if let Some(message) = errors.message() {
        anyhow::bail!("preprocessing failed: {message}");
    }

    let query_count = results.len();
    println!("scans dispatched: {}", summary.total_scans);
    println!("queries produced:  {query_count}");
    println!("max fragment charge observed: {}", max_fragment_charge.get());

    if let Some(path) = output {
        std::fs::write(
            &path,
            format!(
                "scans_dispatched = {}\nqueries_produced = {}\nmax_fragment_charge_observed = {}\n",
                summary.total_scans,
                query_count,
                max_fragment_charge.get(),
            ),
        )
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
        info!("summary written to {}", path.display());
    }

    Ok(())
}
