//! Precursor charge-state inference (§4.5).

use crate::config::Config;
use crate::constants::PROTON_MASS;
use crate::spectrum::{Spectrum, ZState};

/// Resolve the Z-states to process for `spectrum`, consulting its own reported
/// Z-states unless `config.override_charge` forces inference.
///
/// Returns the list of Z-states to run the rest of the pipeline over; does not
/// mutate `spectrum`. Callers that want the inferred states recorded on the
/// spectrum itself should push them via [`Spectrum::add_z_state`].
pub fn infer_charges(spectrum: &Spectrum, config: &Config) -> Vec<ZState> {
    if !spectrum.z_states().is_empty() && !config.override_charge {
        return spectrum.z_states().to_vec();
    }

    let charges: Vec<i32> = if config.start_charge == 0 {
        let mut below = 0.0;
        let mut total = 0.0;
        for peak in spectrum.peaks() {
            total += peak.intensity;
            if peak.mz < spectrum.precursor_mz {
                below += peak.intensity;
            }
        }
        if total == 0.0 || below / total > 0.95 {
            vec![1]
        } else {
            vec![2, 3]
        }
    } else {
        (config.start_charge..=config.end_charge).collect()
    };

    charges
        .into_iter()
        .map(|z| ZState {
            z,
            m: spectrum.precursor_mz * z as f64 - (z - 1) as f64 * PROTON_MASS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActivationMethod;
    use crate::spectrum::Peak;

    fn spectrum_with_peaks(precursor_mz: f64, peaks: Vec<Peak>) -> Spectrum {
        Spectrum::new(1, precursor_mz, ActivationMethod::Hcd, 0.0, peaks, vec![], "scan=1")
    }

    #[test]
    fn reported_z_states_pass_through_unless_overridden() {
        let mut spectrum = spectrum_with_peaks(500.0, vec![]);
        spectrum.add_z_state(2, 998.0);
        let config = Config::default();
        let charges = infer_charges(&spectrum, &config);
        assert_eq!(charges, vec![ZState { z: 2, m: 998.0 }]);
    }

    #[test]
    fn override_charge_ignores_reported_z_states() {
        let mut spectrum = spectrum_with_peaks(500.0, vec![
            Peak { mz: 100.0, intensity: 10.0 },
            Peak { mz: 600.0, intensity: 10.0 },
        ]);
        spectrum.add_z_state(2, 998.0);
        let mut config = Config::default();
        config.override_charge = true;
        let charges = infer_charges(&spectrum, &config);
        assert_eq!(charges.len(), 2);
        assert_eq!(charges[0].z, 2);
        assert_eq!(charges[1].z, 3);
    }

    #[test]
    fn mostly_below_precursor_infers_charge_one() {
        let spectrum = spectrum_with_peaks(
            500.0,
            vec![
                Peak { mz: 100.0, intensity: 96.0 },
                Peak { mz: 600.0, intensity: 4.0 },
            ],
        );
        let config = Config::default();
        let charges = infer_charges(&spectrum, &config);
        assert_eq!(charges, vec![ZState {
            z: 1,
            m: 500.0,
        }]);
    }

    #[test]
    fn mixed_intensity_infers_charge_two_and_three() {
        let spectrum = spectrum_with_peaks(
            500.0,
            vec![
                Peak { mz: 100.0, intensity: 50.0 },
                Peak { mz: 600.0, intensity: 50.0 },
            ],
        );
        let config = Config::default();
        let charges = infer_charges(&spectrum, &config);
        assert_eq!(charges.iter().map(|z| z.z).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn no_signal_infers_charge_one() {
        let spectrum = spectrum_with_peaks(500.0, vec![]);
        let config = Config::default();
        let charges = infer_charges(&spectrum, &config);
        assert_eq!(charges.len(), 1);
        assert_eq!(charges[0].z, 1);
    }

    #[test]
    fn configured_charge_range_is_used() {
        let spectrum = spectrum_with_peaks(500.0, vec![]);
        let mut config = Config::default();
        config.start_charge = 2;
        config.end_charge = 4;
        let charges = infer_charges(&spectrum, &config);
        assert_eq!(charges.iter().map(|z| z.z).collect::<Vec<_>>(), vec![2, 3, 4]);
    }
}
