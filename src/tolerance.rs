//! Precursor-mass tolerance window resolution (§4.4).

use crate::config::{Config, IsotopeError, ToleranceType, ToleranceUnits};
use crate::constants::{C13_DIFF, PROTON_MASS};
use crate::error::PreprocessError;

/// Resolved lower/upper bound of an acceptable neutral peptide mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceWindow {
    /// Lower bound, inclusive.
    pub minus_tol: f64,
    /// Upper bound, inclusive.
    pub plus_tol: f64,
}

/// Resolve the tolerance window around `exp_pep_mass` for a given `charge_state`,
/// per `config`'s tolerance units/type/isotope-error settings.
pub fn resolve(config: &Config, exp_pep_mass: f64, charge_state: i32) -> Result<ToleranceWindow, PreprocessError> {
    let mut tol = match config.tolerance_units {
        ToleranceUnits::Amu => config.input_tolerance,
        ToleranceUnits::Mmu => config.input_tolerance * 0.001,
        ToleranceUnits::Ppm => config.input_tolerance * exp_pep_mass / 1_000_000.0,
    };

    if config.tolerance_type == ToleranceType::PrecursorMz {
        tol *= charge_state as f64;
    }

    let (minus_tol, plus_tol) = match config.isotope_error {
        IsotopeError::Zero => (exp_pep_mass - tol, exp_pep_mass + tol),
        IsotopeError::One => (
            exp_pep_mass - tol - 3.0 * C13_DIFF * PROTON_MASS,
            exp_pep_mass + tol + 1.0 * C13_DIFF * PROTON_MASS,
        ),
        IsotopeError::Two => (exp_pep_mass - tol - 8.1, exp_pep_mass + tol + 8.1),
    };

    Ok(ToleranceWindow { minus_tol, plus_tol })
}
