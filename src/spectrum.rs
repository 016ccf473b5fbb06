//! The externally-provided spectrum value (§3) and its constituent types.

use crate::config::ActivationMethod;

/// Maximum length, in bytes, a native ID is truncated to on construction.
pub const NATIVE_ID_MAX_BYTES: usize = 128;

/// A single (m/z, intensity) peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Mass-to-charge ratio, in Th.
    pub mz: f64,
    /// Signal intensity.
    pub intensity: f64,
}

/// A candidate precursor charge state reported by, or inferred for, a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZState {
    /// Charge state.
    pub z: i32,
    /// Neutral peptide mass implied by this charge state.
    pub m: f64,
}

/// An MS/MS spectrum, immutable once obtained from a [`crate::scan_source::ScanSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Native scan number; `0` is the sentinel the intake loop treats specially (§4.8).
    pub scan_number: i32,
    /// Precursor m/z as reported by the instrument.
    pub precursor_mz: f64,
    /// Fragmentation technique used.
    pub activation: ActivationMethod,
    /// Retention time, in seconds.
    pub retention_time_seconds: f64,
    /// Ordered peak list.
    peaks: Vec<Peak>,
    /// Precursor Z-states reported by the instrument software, if any.
    z_states: Vec<ZState>,
    /// Native ID string, truncated to [`NATIVE_ID_MAX_BYTES`] bytes.
    native_id: String,
}

impl Spectrum {
    /// Build a spectrum, truncating `native_id` to [`NATIVE_ID_MAX_BYTES`] bytes on a
    /// UTF-8 char boundary.
    pub fn new(
        scan_number: i32,
        precursor_mz: f64,
        activation: ActivationMethod,
        retention_time_seconds: f64,
        peaks: Vec<Peak>,
        z_states: Vec<ZState>,
        native_id: impl Into<String>,
    ) -> Self {
        Spectrum {
            scan_number,
            precursor_mz,
            activation,
            retention_time_seconds,
            peaks,
            z_states,
            native_id: truncate_native_id(native_id.into()),
        }
    }

    /// Peak list.
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Number of peaks.
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// True iff the spectrum has no peaks.
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Reported Z-states, if any.
    pub fn z_states(&self) -> &[ZState] {
        &self.z_states
    }

    /// Append a Z-state, e.g. one derived by [`crate::charge_inference::infer_charges`].
    pub fn add_z_state(&mut self, z: i32, m: f64) {
        self.z_states.push(ZState { z, m });
    }

    /// The (possibly truncated) native ID.
    pub fn native_id(&self) -> &str {
        &self.native_id
    }

    /// Zero out the intensity of every peak whose m/z falls within `[start, end]`,
    /// in place. Used by the intake loop's `clearMzRange` filter (§4.8).
    pub fn clear_mz_range(&mut self, start: f64, end: f64) {
        for peak in &mut self.peaks {
            if peak.mz >= start && peak.mz <= end {
                peak.intensity = 0.0;
            }
        }
    }

    /// Number of peaks with strictly positive intensity.
    pub fn peaks_with_signal(&self) -> usize {
        self.peaks.iter().filter(|p| p.intensity > 0.0).count()
    }
}

fn truncate_native_id(mut id: String) -> String {
    if id.len() <= NATIVE_ID_MAX_BYTES {
        return id;
    }
    let mut cut = NATIVE_ID_MAX_BYTES;
    while cut > 0 && !id.is_char_boundary(cut) {
        cut -= 1;
    }
    id.truncate(cut);
    id
}
