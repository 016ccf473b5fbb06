//! Integration tests for xcorrprep
//!
//! These exercise the full pipeline from a synthetic scan source through the
//! intake loop and worker pool to the result queue.

use std::sync::Arc;

use xcorrprep::buffer_pool::BufferPool;
use xcorrprep::config::{ActivationFilter, ActivationMethod, AnalysisType, Config};
use xcorrprep::demo::DemoScanSource;
use xcorrprep::intake::run_intake_loop;
use xcorrprep::query::ScoreVector;
use xcorrprep::shared_state::{ErrorSink, MaxFragmentCharge, ResultQueue};
use xcorrprep::worker_pool::WorkerPool;

fn run_demo(config: Config, scan_count: i32) -> (xcorrprep::intake::IntakeSummary, ResultQueue, ErrorSink, i32) {
    let config = Arc::new(config);
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
    let summary = run_intake_loop(&mut source, &config, &workers, &results, &errors, 1).unwrap();
    workers.wait_all();

    let observed_max_charge = max_fragment_charge.get();
    (summary, results, errors, observed_max_charge)
}

#[test]
fn full_pipeline_produces_dense_queries_by_default() {
    let config = Config::default();
    let (summary, results, errors, max_charge) = run_demo(config, 200);

    assert!(!errors.has_error());
    assert_eq!(summary.total_scans, 200);
    assert!(results.len() >= 200);
    assert!(max_charge >= 1);

    let queries = results.into_vec();
    let first = &queries[0];
    assert!(!first.fast_xcorr.is_sparse());
    assert!(!first.sp_score.is_sparse());
    assert!(first.array_size > 0);
    assert!(first.minus_tol < first.plus_tol);
}

#[test]
fn sparse_matrix_config_produces_sparse_queries() {
    let mut config = Config::default();
    config.sparse_matrix_enabled = true;
    let (summary, results, errors, _) = run_demo(config, 50);

    assert!(!errors.has_error());
    assert_eq!(summary.total_scans, 50);
    let queries = results.into_vec();
    assert!(queries.iter().all(|q| q.fast_xcorr.is_sparse()));
    assert!(queries.iter().all(|q| q.sp_score.is_sparse()));

    if let ScoreVector::Sparse(entries) = &queries[0].sp_score {
        assert!(entries.iter().all(|e| e.intensity.abs() > xcorrprep::constants::FLOAT_ZERO as f32));
        assert!(entries.iter().all(|e| e.bin >= 0 && e.bin < queries[0].array_size));
    } else {
        panic!("expected sparse sp_score");
    }
}

#[test]
fn activation_filter_admits_only_matching_spectra() {
    let mut config = Config::default();
    config.activation_method = ActivationFilter::Only(ActivationMethod::Cid);
    let (summary, results, errors, _) = run_demo(config, 30);

    assert!(!errors.has_error());
    assert_eq!(summary.total_scans, 0);
    assert_eq!(results.len(), 0);
}

#[test]
fn specific_scan_range_bounds_dispatched_scans() {
    let mut config = Config::default();
    config.analysis_type = AnalysisType::SpecificScanRange;
    config.first_scan = 1;
    config.last_scan = 5;
    let (summary, _results, errors, _) = run_demo(config, 50);

    assert!(!errors.has_error());
    assert!(summary.total_scans <= 5);
}

#[test]
fn high_mass_filter_excludes_all_demo_queries() {
    let mut config = Config::default();
    config.low_peptide_mass = 1.0;
    config.high_peptide_mass = 2.0;
    let (summary, results, errors, _) = run_demo(config, 20);

    assert!(!errors.has_error());
    assert!(summary.total_scans > 0);
    assert_eq!(results.len(), 0);
}
