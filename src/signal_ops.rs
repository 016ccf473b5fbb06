//! Numeric kernels applied to a spectrum's dense working buffers (§4.2).
//!
//! Every function here is a pure transform over caller-supplied slices so the
//! [`crate::preprocessor`] orchestration can drive them against buffers borrowed
//! from the [`crate::buffer_pool::BufferPool`] without any additional allocation.

use crate::bin_math::{bin, PrecalcMasses};
use crate::config::{Config, RemovePrecursorPolicy};
use crate::constants::{FLOAT_ZERO, NUM_SP_IONS, PROTON_MASS};
use crate::spectrum::Spectrum;

/// Running totals produced by [`load_ions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadIonsSummary {
    /// Sum of every admitted peak's raw intensity (before the precursor-removal gate).
    pub total_intensity: f64,
    /// Highest non-empty bin index written to `raw_data`.
    pub highest_ion: i32,
    /// Highest value written to `raw_data`.
    pub highest_intensity: f64,
}

/// Bin every admissible peak of `spectrum` into `raw_data[0..array_size]` as
/// `sqrt(intensity)`, applying the minimum-intensity gate and precursor-removal
/// policy (§4.2, `LoadIons`).
pub fn load_ions(
    spectrum: &Spectrum,
    config: &Config,
    charge_state: i32,
    exp_pep_mass: f64,
    array_size: usize,
    raw_data: &mut [f64],
) -> LoadIonsSummary {
    let mut summary = LoadIonsSummary::default();
    let mz_ceiling = exp_pep_mass + 50.0;

    for peak in spectrum.peaks() {
        if peak.intensity <= 0.0 || peak.intensity < config.min_intensity {
            continue;
        }
        if peak.mz >= mz_ceiling {
            continue;
        }
        summary.total_intensity += peak.intensity;

        let b = bin(peak.mz, config.inverse_bin_width, config.bin_offset);
        let v = peak.intensity.sqrt();
        summary.highest_ion = summary.highest_ion.max(b);

        if b < 0 || b as usize >= array_size {
            continue;
        }
        let idx = b as usize;
        if v <= raw_data[idx] {
            continue;
        }
        if !precursor_accepted(peak.mz, config, charge_state, exp_pep_mass) {
            continue;
        }
        raw_data[idx] = v;
        summary.highest_intensity = summary.highest_intensity.max(raw_data[idx]);
    }

    summary
}

fn precursor_accepted(mz: f64, config: &Config, charge_state: i32, exp_pep_mass: f64) -> bool {
    match config.remove_precursor {
        RemovePrecursorPolicy::Accept => true,
        RemovePrecursorPolicy::CurrentCharge => {
            let mz_j = (exp_pep_mass + (charge_state as f64 - 1.0) * PROTON_MASS) / charge_state as f64;
            (mz - mz_j).abs() > config.remove_precursor_tol
        }
        RemovePrecursorPolicy::AllChargeStates => (1..=charge_state).all(|j| {
            let mz_j = (exp_pep_mass + (j as f64 - 1.0) * PROTON_MASS) / j as f64;
            (mz - mz_j).abs() >= config.remove_precursor_tol
        }),
    }
}

/// Normalize `raw_data` so its maximum is `100`, then rescale per-window so each
/// window's own maximum becomes `50`, zeroing bins below `5%` of the post-rescale
/// overall maximum (§4.2, `MakeCorrData`).
///
/// `raw_data` is normalized in place; `correlation_data` receives the windowed
/// result and must be the same length.
pub fn make_corr_data(raw_data: &mut [f64], correlation_data: &mut [f64], highest_ion: i32, highest_intensity: f64) {
    correlation_data.fill(0.0);
    if highest_intensity <= FLOAT_ZERO || highest_ion < 0 {
        return;
    }

    let scale = 100.0 / highest_intensity;
    for v in raw_data.iter_mut() {
        *v *= scale;
    }

    const NUM_WINDOWS: i32 = 10;
    let window_size = (highest_ion / NUM_WINDOWS) + 1;
    let overall_max = raw_data
        .iter()
        .take((highest_ion as usize + 1).min(raw_data.len()))
        .cloned()
        .fold(0.0f64, f64::max);

    for window in 0..NUM_WINDOWS {
        let start = (window * window_size).max(0) as usize;
        let end = (((window + 1) * window_size) as usize).min(raw_data.len());
        if start >= end {
            continue;
        }
        let window_max = raw_data[start..end].iter().cloned().fold(0.0f64, f64::max);
        if window_max <= 0.0 {
            continue;
        }
        let window_scale = 50.0 / window_max;
        for i in start..end {
            if raw_data[i] > 0.05 * overall_max {
                correlation_data[i] = raw_data[i] * window_scale;
            }
        }
    }
}

/// Per-bin boxcar mean, computed via a running sum over a 151-wide window (75
/// behind, 75 ahead, center excluded), weighted by `1/150` (§4.2, the `FastXcorr`
/// boxcar pass). `mean_around` must be the same length as `corr`.
pub fn boxcar_mean(corr: &[f64], mean_around: &mut [f64]) {
    let array_size = corr.len();
    const HALF_WIDTH: usize = 75;
    const FULL_WIDTH: usize = 151;
    const WEIGHT: f64 = 0.006_666_666_666_666_67;

    let mut running_sum: f64 = corr.iter().take(HALF_WIDTH).sum();
    for i in HALF_WIDTH..array_size + HALF_WIDTH {
        if i < array_size {
            running_sum += corr[i];
        }
        if i >= FULL_WIDTH {
            running_sum -= corr[i - FULL_WIDTH];
        }
        mean_around[i - HALF_WIDTH] = (running_sum - corr[i - HALF_WIDTH]) * WEIGHT;
    }
}

/// `fastXcorr[i] = corr[i] - meanAround[i]` for `i >= 1`; `fastXcorr[0] = 0`, with
/// optional flanking-peak augmentation (§4.2).
pub fn fast_xcorr(corr: &[f64], mean_around: &[f64], flanking: bool, out: &mut [f32]) {
    let array_size = corr.len();
    out[0] = 0.0;
    for i in 1..array_size {
        out[i] = (corr[i] - mean_around[i]) as f32;
    }
    if flanking {
        for i in 1..array_size {
            let mut delta = 0.0f64;
            if i >= 1 {
                delta += 0.5 * (corr[i - 1] - mean_around[i - 1]);
            }
            if i + 1 < array_size {
                delta += 0.5 * (corr[i + 1] - mean_around[i + 1]);
            }
            out[i] += delta as f32;
        }
    }
}

/// Overlay neutral-loss contributions offset by `BIN(H2O)` and `BIN(NH3)` bins onto
/// a copy of `fast_xcorr` (§4.2).
pub fn neutral_loss_overlay(
    corr: &[f64],
    mean_around: &[f64],
    fast_xcorr: &[f32],
    precalc: PrecalcMasses,
) -> Vec<f32> {
    let array_size = corr.len() as i32;
    let term = |i: i32, offset: i32| -> f64 {
        let j = i - offset;
        if j < 0 || j >= array_size {
            0.0
        } else {
            corr[j as usize] - mean_around[j as usize]
        }
    };

    (0..fast_xcorr.len())
        .map(|idx| {
            let i = idx as i32;
            let base = fast_xcorr[idx] as f64;
            let delta = 0.2 * term(i, precalc.i_minus_17) + 0.2 * term(i, precalc.i_minus_18);
            (base + delta) as f32
        })
        .collect()
}

/// 1-4-6-4-1 binomial smoothing; edges (`0`, `1`, `len-2`, `len-1`) are zeroed
/// (§4.2, `Smooth`). Operates on `f64` so it composes directly with `PeakExtract`.
/// `scratch` is caller-supplied working space (at least `data.len()` long) so
/// this never allocates on the hot path; its contents are overwritten.
pub fn smooth(data: &mut [f64], scratch: &mut [f64]) {
    let n = data.len();
    if n < 4 {
        data.fill(0.0);
        return;
    }
    scratch[..n].fill(0.0);
    for i in 2..n - 2 {
        scratch[i] = (data[i - 2] + 4.0 * data[i - 1] + 6.0 * data[i] + 4.0 * data[i + 1] + data[i + 2]) / 16.0;
    }
    data.copy_from_slice(&scratch[..n]);
}

/// Two-pass peak extraction against a local `+/-50` bin neighborhood (§4.2,
/// `PeakExtract`). `data` is zeroed at pass-1 extraction sites; `extracted`
/// receives the final result and must be the same length as `data`, pre-zeroed.
///
/// Preserves the spec's asymmetric divisor: the neighborhood mean divides by `n`
/// (the neighborhood's element count) while its variance divides by `n + 1`; this
/// is carried over verbatim from the original implementation (§9, open question).
pub fn peak_extract(data: &mut [f64], extracted: &mut [f64]) {
    let n = data.len();
    const RADIUS: usize = 50;

    let mean_and_stddev = |data: &[f64], i: usize| -> (f64, f64) {
        let start = i.saturating_sub(RADIUS);
        let end = (i + RADIUS).min(n - 1);
        let count = (end - start + 1) as f64;
        let window = &data[start..=end];
        let mean = window.iter().sum::<f64>() / count;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count + 1.0);
        (mean, variance.sqrt())
    };

    // Pass 1.
    for i in 0..n {
        let (mean, stddev) = mean_and_stddev(data, i);
        if data[i] > mean + stddev {
            extracted[i] = data[i] - mean + stddev;
            data[i] = 0.0;
        }
    }

    // Pass 2, against the pass-1-modified data.
    for i in 0..n {
        let (mean, stddev) = mean_and_stddev(data, i);
        if data[i] > mean + 2.0 * stddev {
            let candidate = data[i] - mean + stddev;
            if candidate > extracted[i] {
                extracted[i] = candidate;
            }
        }
    }

    data.copy_from_slice(extracted);
}

/// One candidate ion retained by [`get_top_ions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopIon {
    /// Bin index.
    pub ion: i32,
    /// Intensity at that bin.
    pub intensity: f32,
}

/// Keep the `NUM_SP_IONS` most intense non-zero bins of `raw_data`, then rescale so
/// the most intense retained bin is `100` (§4.2, `GetTopIons`).
pub fn get_top_ions(raw_data: &[f64]) -> Vec<TopIon> {
    let mut bucket: Vec<TopIon> = Vec::with_capacity(NUM_SP_IONS);

    for (i, &value) in raw_data.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        if bucket.len() < NUM_SP_IONS {
            bucket.push(TopIon {
                ion: i as i32,
                intensity: value as f32,
            });
            continue;
        }
        let (min_idx, &min_ion) = bucket
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.intensity.partial_cmp(&b.1.intensity).unwrap())
            .unwrap();
        if (value as f32) > min_ion.intensity {
            bucket[min_idx] = TopIon {
                ion: i as i32,
                intensity: value as f32,
            };
        }
    }

    let max_in_bucket = bucket.iter().map(|t| t.intensity).fold(0.0f32, f32::max);
    if max_in_bucket > 0.0 {
        for ion in &mut bucket {
            ion.intensity = (ion.intensity / max_in_bucket) * 100.0;
        }
    }
    bucket
}

/// Sort a `GetTopIons` bucket into ascending-bin order (§4.2, `QsortByIon`).
pub fn sort_by_ion(ions: &mut [TopIon]) {
    ions.sort_by_key(|ion| ion.ion);
}

/// Merge runs of consecutive (post-sort) ions within `fragment_bin_size` of each
/// other into a plateau at the run's maximum intensity (§4.2, `StairStep`).
/// `ions` must already be sorted by ascending `ion` (see [`sort_by_ion`]).
pub fn stair_step(ions: &mut [TopIon], fragment_bin_size: f64) {
    let mut run_start = 0usize;
    while run_start < ions.len() {
        let mut run_end = run_start;
        while run_end + 1 < ions.len()
            && ((ions[run_end + 1].ion - ions[run_end].ion) as f64) <= fragment_bin_size
        {
            run_end += 1;
        }
        let run_max = ions[run_start..=run_end]
            .iter()
            .map(|i| i.intensity)
            .fold(0.0f32, f32::max);
        for ion in &mut ions[run_start..=run_end] {
            ion.intensity = run_max;
        }
        run_start = run_end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_smooth_on_delta() {
        let mut data = vec![0.0, 0.0, 0.0, 16.0, 0.0, 0.0, 0.0];
        let mut scratch = vec![0.0; data.len()];
        smooth(&mut data, &mut scratch);
        assert_eq!(data, vec![0.0, 0.0, 0.0, 6.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn smooth_zeroes_edges() {
        let mut data = vec![5.0; 10];
        let mut scratch = vec![0.0; data.len()];
        smooth(&mut data, &mut scratch);
        assert_eq!(data[0], 0.0);
        assert_eq!(data[1], 0.0);
        assert_eq!(data[data.len() - 2], 0.0);
        assert_eq!(data[data.len() - 1], 0.0);
    }

    #[test]
    fn s3_fast_xcorr_trivial() {
        let array_size = 200;
        let corr = vec![0.0; array_size];
        let mut mean_around = vec![0.0; array_size];
        boxcar_mean(&corr, &mut mean_around);
        let mut out = vec![0.0f32; array_size];
        fast_xcorr(&corr, &mean_around, false, &mut out);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn make_corr_data_normalization_fixpoint() {
        let mut raw = vec![0.0; 500];
        raw[10] = 4.0;
        raw[20] = 2.0;
        raw[300] = 1.0;
        let mut corr = vec![0.0; 500];
        let highest_ion = 300;
        let highest_intensity = 4.0;
        make_corr_data(&mut raw, &mut corr, highest_ion, highest_intensity);
        let max = raw.iter().cloned().fold(0.0f64, f64::max);
        assert!((max - 100.0).abs() < 1e-9);
    }

    #[test]
    fn get_top_ions_caps_at_num_sp_ions_and_rescales() {
        let mut raw = vec![0.0; 2000];
        for (i, v) in raw.iter_mut().enumerate() {
            *v = (i % 50) as f64 + 1.0;
        }
        let top = get_top_ions(&raw);
        assert!(top.len() <= NUM_SP_IONS);
        let max = top.iter().map(|t| t.intensity).fold(0.0f32, f32::max);
        assert!((max - 100.0).abs() < 1e-4);
    }

    #[test]
    fn get_top_ions_empty_when_all_zero() {
        let raw = vec![0.0; 100];
        let top = get_top_ions(&raw);
        assert!(top.is_empty());
    }

    #[test]
    fn stair_step_merges_close_runs() {
        let mut ions = vec![
            TopIon { ion: 10, intensity: 5.0 },
            TopIon { ion: 11, intensity: 9.0 },
            TopIon { ion: 12, intensity: 3.0 },
            TopIon { ion: 50, intensity: 1.0 },
        ];
        stair_step(&mut ions, 1.0005);
        assert_eq!(ions[0].intensity, 9.0);
        assert_eq!(ions[1].intensity, 9.0);
        assert_eq!(ions[2].intensity, 9.0);
        assert_eq!(ions[3].intensity, 1.0);
    }

    #[test]
    fn stair_step_idempotent() {
        let mut ions = vec![
            TopIon { ion: 1, intensity: 2.0 },
            TopIon { ion: 2, intensity: 8.0 },
            TopIon { ion: 40, intensity: 4.0 },
        ];
        stair_step(&mut ions, 1.5);
        let once = ions.clone();
        stair_step(&mut ions, 1.5);
        assert_eq!(ions, once);
    }

    #[test]
    fn precursor_removal_all_charge_states() {
        let mut config = Config::default();
        config.remove_precursor = RemovePrecursorPolicy::AllChargeStates;
        config.remove_precursor_tol = 0.5;
        let charge_state = 2;
        let exp_pep_mass = 1000.0;
        let mz_1 = exp_pep_mass + PROTON_MASS; // j=1 (z-state math uses charge 1 baseline? exercised below)
        let _ = mz_1;

        let mz_for = |j: i32| (exp_pep_mass + (j as f64 - 1.0) * PROTON_MASS) / j as f64;
        for j in 1..=charge_state {
            assert!(!precursor_accepted(mz_for(j), &config, charge_state, exp_pep_mass));
        }
        assert!(precursor_accepted(1.0, &config, charge_state, exp_pep_mass));
    }
}
