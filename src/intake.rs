//! Single-threaded scan intake loop: reads spectra from a [`ScanSource`], applies
//! the admission filters, and dispatches survivors to the [`WorkerPool`] (§4.8).

use crate::config::{ActivationFilter, AnalysisType, Config, InputType};
use crate::error::ReaderError;
use crate::scan_source::ScanSource;
use crate::shared_state::{ErrorSink, ResultQueue};
use crate::spectrum::Spectrum;
use crate::worker_pool::WorkerPool;

/// Outcome of running the intake loop to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntakeSummary {
    /// Spectra dispatched to the worker pool.
    pub total_scans: i32,
}

/// Drive `source` through `workers` until the stream or the run's scope is exhausted.
///
/// `results` is consulted (never mutated) purely to snapshot its length for the
/// `spectrumBatchSize` check, since workers append to it concurrently with this loop.
pub fn run_intake_loop(
    source: &mut dyn ScanSource,
    config: &Config,
    workers: &WorkerPool,
    results: &ResultQueue,
    errors: &ErrorSink,
    first_scan_hint: i32,
) -> Result<IntakeSummary, ReaderError> {
    let mut first_scan = true;
    let mut file_last_scan: Option<i32> = None;
    let mut total_scans = 0i32;
    let mut loaded_since_batch_start = 0usize;
    let mut probe_count = 0i32;

    loop {
        let spectrum = if first_scan {
            first_scan = false;
            source.read(first_scan_hint)?
        } else {
            source.read_next()?
        };

        let last_scan = *file_last_scan.get_or_insert_with(|| source.last_scan());
        if last_scan < config.first_scan {
            break;
        }

        if spectrum.scan_number == 0 {
            if config.input_type != InputType::Mzxml {
                break;
            }
            probe_count += 1;
            if probe_count > last_scan {
                break;
            }
            continue;
        }

        let mut spectrum = spectrum;
        if let Some(range) = config.clear_mz_range {
            spectrum.clear_mz_range(range.start, range.end);
        }

        let should_dispatch = spectrum.peaks_with_signal() >= config.min_peaks;

        if should_dispatch {
            if config.analysis_type == AnalysisType::SpecificScanRange
                && config.last_scan > 0
                && spectrum.scan_number > config.last_scan
            {
                break;
            }

            if activation_matches(&spectrum, config) {
                loaded_since_batch_start = results.len() + 1;
                log::debug!(
                    "dispatching scan {} (charge inference deferred to worker)",
                    spectrum.scan_number
                );
                workers.dispatch(spectrum.clone());
                total_scans += 1;
            } else {
                log::warn!("scan {} rejected by activation filter", spectrum.scan_number);
            }
        } else {
            log::warn!(
                "scan {} has {} peaks after filtering, below min_peaks={}",
                spectrum.scan_number,
                spectrum.peaks_with_signal(),
                config.min_peaks
            );
        }

        if check_exit(config, errors, &spectrum, total_scans, last_scan, loaded_since_batch_start) {
            break;
        }
    }

    Ok(IntakeSummary { total_scans })
}

fn activation_matches(spectrum: &Spectrum, config: &Config) -> bool {
    match config.activation_method {
        ActivationFilter::All => true,
        ActivationFilter::Only(method) => {
            spectrum.activation == crate::config::ActivationMethod::Na || spectrum.activation == method
        }
    }
}

fn check_exit(
    config: &Config,
    errors: &ErrorSink,
    spectrum: &Spectrum,
    total_scans: i32,
    last_scan: i32,
    loaded_since_batch_start: usize,
) -> bool {
    if errors.has_error() {
        return true;
    }
    if config.analysis_type == AnalysisType::SpecificScan {
        return true;
    }
    if config.analysis_type == AnalysisType::SpecificScanRange
        && config.last_scan > 0
        && spectrum.scan_number >= config.last_scan
    {
        return true;
    }
    if config.analysis_type == AnalysisType::EntireFile
        && config.input_type == InputType::Mzxml
        && spectrum.scan_number == 0
    {
        return true;
    }
    if config.input_type == InputType::Mzxml && total_scans > last_scan {
        return true;
    }
    if config.spectrum_batch_size > 0 && loaded_since_batch_start >= config.spectrum_batch_size {
        return true;
    }
    false
}
