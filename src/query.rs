//! The [`Query`] produced per `(spectrum, precursor-charge)` pair (§3, §9).

/// A single sparse entry: a bin where the dense value changed, and its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseEntry {
    /// Bin index.
    pub bin: i32,
    /// Intensity at this run's start.
    pub intensity: f32,
}

/// A score vector, represented as either a dense array or a run-change sparse
/// encoding (§9's "two shapes chosen at runtime" note).
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreVector {
    /// One value per bin, `0..array_size`.
    Dense(Vec<f32>),
    /// Ascending `(bin, intensity)` runs, bracketed by `(0,0)` and `(array_size,0)`.
    Sparse(Vec<SparseEntry>),
}

impl ScoreVector {
    /// True iff this is the sparse representation.
    pub fn is_sparse(&self) -> bool {
        matches!(self, ScoreVector::Sparse(_))
    }
}

/// Per-`(spectrum, charge)` preprocessing result, ready for peptide-search scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Originating scan number.
    pub scan_number: i32,
    /// Precursor charge state this query was built for.
    pub charge_state: i32,
    /// Neutral peptide mass implied by `charge_state`.
    pub exp_pep_mass: f64,
    /// Length of every dense (or backing) vector: `floor((exp_pep_mass+100) * inverseBinWidth)`.
    pub array_size: i32,
    /// Highest fragment ion charge considered for this query.
    pub max_frag_charge: i32,
    /// Retention time, in seconds, copied from the originating spectrum.
    pub retention_time_seconds: f64,
    /// Native ID, copied from the originating spectrum.
    pub native_id: String,
    /// Lower bound of the resolved precursor-mass tolerance window.
    pub minus_tol: f64,
    /// Upper bound of the resolved precursor-mass tolerance window.
    pub plus_tol: f64,
    /// Fast cross-correlation vector.
    pub fast_xcorr: ScoreVector,
    /// Neutral-loss-augmented cross-correlation vector, when enabled.
    pub fast_xcorr_nl: Option<ScoreVector>,
    /// Preliminary (Sp) score vector.
    pub sp_score: ScoreVector,
}
