//! Per-spectrum orchestration: charge inference through to queued [`Query`]
//! results (§4.6).

use crate::buffer_pool::BufferPool;
use crate::charge_inference::infer_charges;
use crate::config::Config;
use crate::error::PreprocessError;
use crate::query::{Query, ScoreVector};
use crate::shared_state::{ErrorSink, MaxFragmentCharge, ResultQueue};
use crate::signal_ops::{
    boxcar_mean, fast_xcorr, get_top_ions, load_ions, make_corr_data, neutral_loss_overlay, peak_extract,
    smooth, sort_by_ion, stair_step, TopIon,
};
use crate::skip_output::should_skip;
use crate::sparse_builder::encode;
use crate::spectrum::Spectrum;
use crate::tolerance::resolve;
use crate::bin_math::PrecalcMasses;

/// Run every applicable charge state of `spectrum` through the preprocessing
/// pipeline, pushing one [`Query`] per accepted `(spectrum, charge)` pair onto
/// `results`. Errors are latched onto `errors` and abort the remaining charge
/// states of this spectrum; they never propagate to the caller directly, since
/// the intake loop drives many of these concurrently.
pub fn preprocess_spectrum(
    spectrum: &Spectrum,
    config: &Config,
    pool: &BufferPool,
    results: &ResultQueue,
    max_fragment_charge: &MaxFragmentCharge,
    errors: &ErrorSink,
) {
    let z_states = infer_charges(spectrum, config);

    for z_state in z_states {
        if errors.has_error() {
            return;
        }
        if should_skip(config, spectrum.scan_number, z_state.z) {
            continue;
        }
        let mass_ok = config.low_peptide_mass == 0.0
            || (z_state.m >= config.low_peptide_mass && z_state.m <= config.high_peptide_mass);
        if !mass_ok || z_state.z > config.max_precursor_charge {
            continue;
        }

        match build_query(spectrum, config, pool, z_state.z, z_state.m, max_fragment_charge) {
            Ok(query) => results.push(query),
            Err(error) => {
                errors.set_error(error);
                return;
            }
        }
    }
}

fn build_query(
    spectrum: &Spectrum,
    config: &Config,
    pool: &BufferPool,
    charge_state: i32,
    exp_pep_mass: f64,
    max_fragment_charge: &MaxFragmentCharge,
) -> Result<Query, PreprocessError> {
    let array_size = ((exp_pep_mass + 100.0) * config.inverse_bin_width).floor() as usize;
    let max_frag_charge = if charge_state == 1 { 1 } else { charge_state - 1 }.min(config.max_fragment_charge);
    max_fragment_charge.observe(max_frag_charge);

    let tolerance = resolve(config, exp_pep_mass, charge_state)?;

    let mut scratch = pool.acquire()?;
    scratch.zero_prefix(array_size);
    let buffers = &mut *scratch;

    let summary = load_ions(
        spectrum,
        config,
        charge_state,
        exp_pep_mass,
        array_size,
        &mut buffers.raw_data[..array_size],
    );

    make_corr_data(
        &mut buffers.raw_data[..array_size],
        &mut buffers.correlation_data[..array_size],
        summary.highest_ion,
        summary.highest_intensity,
    );
    boxcar_mean(&buffers.correlation_data[..array_size], &mut buffers.mean_around[..array_size]);

    let flanking = config.theoretical_fragment_ions == 0;
    let mut dense_xcorr = vec![0.0f32; array_size];
    fast_xcorr(
        &buffers.correlation_data[..array_size],
        &buffers.mean_around[..array_size],
        flanking,
        &mut dense_xcorr,
    );

    let dense_xcorr_nl = if config.use_neutral_loss && config.ion_series.any_enabled() {
        let precalc = PrecalcMasses::new(config.inverse_bin_width, config.bin_offset);
        Some(neutral_loss_overlay(
            &buffers.correlation_data[..array_size],
            &buffers.mean_around[..array_size],
            &dense_xcorr,
            precalc,
        ))
    } else {
        None
    };

    let fast_xcorr_vec = encode(dense_xcorr, config);
    let fast_xcorr_nl_vec = dense_xcorr_nl.map(|dense| encode(dense, config));

    if config.fragment_bin_size >= 0.10 {
        smooth(&mut buffers.raw_data[..array_size], &mut buffers.sp_scratch[..array_size]);
        buffers.extracted[..array_size].fill(0.0);
        let (raw, extracted) = (
            &mut buffers.raw_data[..array_size],
            &mut buffers.extracted[..array_size],
        );
        peak_extract(raw, extracted);
    }

    let mut top_ions: Vec<TopIon> = get_top_ions(&buffers.raw_data[..array_size]);
    sort_by_ion(&mut top_ions);
    stair_step(&mut top_ions, config.fragment_bin_size);

    let sp_score = build_sp_score(&top_ions, array_size, config);

    Ok(Query {
        scan_number: spectrum.scan_number,
        charge_state,
        exp_pep_mass,
        array_size: array_size as i32,
        max_frag_charge,
        retention_time_seconds: spectrum.retention_time_seconds,
        native_id: spectrum.native_id().to_string(),
        minus_tol: tolerance.minus_tol,
        plus_tol: tolerance.plus_tol,
        fast_xcorr: fast_xcorr_vec,
        fast_xcorr_nl: fast_xcorr_nl_vec,
        sp_score,
    })
}

fn build_sp_score(top_ions: &[TopIon], array_size: usize, config: &Config) -> ScoreVector {
    if config.sparse_matrix_enabled {
        let entries = top_ions
            .iter()
            .filter(|ion| ion.intensity.abs() > crate::constants::FLOAT_ZERO as f32)
            .map(|ion| crate::query::SparseEntry {
                bin: ion.ion,
                intensity: ion.intensity,
            })
            .collect();
        ScoreVector::Sparse(entries)
    } else {
        let mut dense = vec![0.0f32; array_size];
        for ion in top_ions {
            if (ion.ion as usize) < array_size {
                dense[ion.ion as usize] = ion.intensity;
            }
        }
        ScoreVector::Dense(dense)
    }
}
