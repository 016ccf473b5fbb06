//! Layered runtime configuration: compiled-in defaults, optional TOML file overlay,
//! and CLI overrides, merged once into an immutable [`Config`] before a run starts.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Fragmentation technique tagged on a spectrum, or the `ALL` filter sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivationMethod {
    /// Not available / unspecified.
    #[serde(rename = "NA")]
    Na,
    /// Collision-induced dissociation.
    Cid,
    /// Higher-energy collisional dissociation.
    Hcd,
    /// Electron-transfer dissociation.
    Etd,
    /// Electron-capture dissociation.
    Ecd,
    /// Pulsed-Q dissociation.
    Pqd,
    /// Infrared multiphoton dissociation.
    Irmpd,
}

/// How the activation-method filter is configured: admit everything, or only a
/// specific method (spectra tagged `NA` still pass regardless, per §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationFilter {
    /// Admit every spectrum regardless of activation method.
    #[default]
    All,
    /// Admit only spectra tagged with this method (`NA` spectra still pass).
    Only(ActivationMethod),
}

impl<'de> Deserialize<'de> for ActivationFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("all") {
            return Ok(ActivationFilter::All);
        }
        let method = match raw.to_ascii_uppercase().as_str() {
            "NA" => ActivationMethod::Na,
            "CID" => ActivationMethod::Cid,
            "HCD" => ActivationMethod::Hcd,
            "ETD" => ActivationMethod::Etd,
            "ECD" => ActivationMethod::Ecd,
            "PQD" => ActivationMethod::Pqd,
            "IRMPD" => ActivationMethod::Irmpd,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown activation method: {other}"
                )))
            }
        };
        Ok(ActivationFilter::Only(method))
    }
}

/// Precursor-removal policy applied while loading ions (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovePrecursorPolicy {
    /// Accept every peak; no precursor removal.
    #[default]
    Accept = 0,
    /// Remove peaks within tolerance of the current charge state's precursor m/z.
    CurrentCharge = 1,
    /// Remove peaks within tolerance of any charge state's precursor m/z, `1..=chargeState`.
    AllChargeStates = 2,
}

impl RemovePrecursorPolicy {
    /// Round-trips through the original `{0,1,2}` numeric encoding.
    pub fn from_code(code: i32) -> Result<Self, ConfigError> {
        match code {
            0 => Ok(RemovePrecursorPolicy::Accept),
            1 => Ok(RemovePrecursorPolicy::CurrentCharge),
            2 => Ok(RemovePrecursorPolicy::AllChargeStates),
            other => Err(ConfigError::Invalid(format!(
                "invalid remove_precursor code: {other}"
            ))),
        }
    }
}

/// Units the configured precursor tolerance is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceUnits {
    /// Daltons.
    Amu,
    /// Milli-Daltons.
    Mmu,
    /// Parts per million.
    #[default]
    Ppm,
}

/// Whether the tolerance is applied to the neutral peptide mass or to m/z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToleranceType {
    /// Peptide neutral monoisotopic mass.
    #[default]
    Peptide,
    /// Precursor m/z (tolerance is multiplied by charge state).
    PrecursorMz,
}

/// Isotope-error window expansion applied on top of the base tolerance (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum IsotopeError {
    /// No expansion.
    #[default]
    Zero,
    /// `-3/+1` carbon-13 isotope window.
    One,
    /// Fixed `±8.1` Da window.
    Two,
}

impl IsotopeError {
    /// Round-trips through the original `{0,1,2}` numeric encoding, rejecting anything else.
    pub fn from_code(code: i32) -> Result<Self, crate::error::PreprocessError> {
        match code {
            0 => Ok(IsotopeError::Zero),
            1 => Ok(IsotopeError::One),
            2 => Ok(IsotopeError::Two),
            other => Err(crate::error::PreprocessError::InvalidIsotopeError(other)),
        }
    }
}

/// Scope of a single preprocessing run over a scan stream (§4.8, `CheckExit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    /// Process every admissible spectrum in the stream.
    #[default]
    EntireFile,
    /// Process exactly one scan, then stop.
    SpecificScan,
    /// Process scans in `[firstScan, lastScan]`.
    SpecificScanRange,
}

/// Input format family. Only the `MzXml` vs. everything-else distinction matters to
/// the intake loop's scan-number-zero probe logic (§4.8, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// mzXML source: a `scanNumber == 0` read means "no MS/MS at this index, keep probing".
    Mzxml,
    /// Any other source: `scanNumber == 0` means end of stream.
    #[default]
    Other,
}

/// An inclusive m/z range whose matching peaks are zeroed out before admission checks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ClearMzRange {
    /// Lower bound, inclusive.
    pub start: f64,
    /// Upper bound, inclusive.
    pub end: f64,
}

/// Which fragment ion series are enabled; gates the neutral-loss overlay (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct IonSeries {
    /// a-ions enabled.
    #[serde(default)]
    pub a: bool,
    /// b-ions enabled.
    #[serde(default = "default_true")]
    pub b: bool,
    /// y-ions enabled.
    #[serde(default = "default_true")]
    pub y: bool,
}

fn default_true() -> bool {
    true
}

impl Default for IonSeries {
    fn default() -> Self {
        IonSeries {
            a: false,
            b: true,
            y: true,
        }
    }
}

impl IonSeries {
    /// True iff any of A/B/Y is enabled, the gate for the neutral-loss overlay.
    pub fn any_enabled(&self) -> bool {
        self.a || self.b || self.y
    }
}

/// Immutable, fully-resolved run configuration. Constructed once via [`Config::load`]
/// and shared by reference (`Arc<Config>`) with the intake loop and every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Mass-to-bin scale factor (§4.1).
    pub inverse_bin_width: f64,
    /// Bin mapping offset (§4.1).
    pub bin_offset: f64,
    /// Upper bound of admissible peptide neutral mass; also sizes the buffer pool.
    pub high_peptide_mass: f64,
    /// Lower bound of admissible peptide neutral mass; `0.0` disables the check.
    pub low_peptide_mass: f64,
    /// Minimum peak intensity admitted by `LoadIons`.
    pub min_intensity: f64,
    /// Minimum peak count required after `clear_mz_range` is applied.
    pub min_peaks: usize,
    /// Optional m/z window whose peaks are zeroed before admission checks.
    pub clear_mz_range: Option<ClearMzRange>,
    /// Precursor-removal policy (§4.2).
    pub remove_precursor: RemovePrecursorPolicy,
    /// Precursor-removal tolerance, in Daltons.
    pub remove_precursor_tol: f64,
    /// First charge state to try when the spectrum has no usable Z-states and this
    /// is nonzero; `0` triggers the below-precursor-intensity-fraction rule.
    pub start_charge: i32,
    /// Last charge state to try, inclusive, when `start_charge != 0`.
    pub end_charge: i32,
    /// Ignore the spectrum's own Z-states even when present.
    pub override_charge: bool,
    /// Highest admissible precursor charge.
    pub max_precursor_charge: i32,
    /// Highest configured fragment ion charge.
    pub max_fragment_charge: i32,
    /// Enable the neutral-loss overlay when A/B/Y ions are in use.
    pub use_neutral_loss: bool,
    /// Which fragment ion series are enabled.
    pub ion_series: IonSeries,
    /// `0` enables flanking-peak augmentation of `fastXcorr`.
    pub theoretical_fragment_ions: i32,
    /// Encode output vectors as sparse `(bin, intensity)` runs instead of dense arrays.
    pub sparse_matrix_enabled: bool,
    /// Stair-step merge gap and the smoothing/peak-extraction gate (threshold `0.10`).
    pub fragment_bin_size: f64,
    /// Units of `input_tolerance`.
    pub tolerance_units: ToleranceUnits,
    /// Whether the tolerance targets the neutral mass or precursor m/z.
    pub tolerance_type: ToleranceType,
    /// Tolerance magnitude, in `tolerance_units`.
    pub input_tolerance: f64,
    /// Isotope-error window expansion.
    pub isotope_error: IsotopeError,
    /// Activation-method admission filter.
    pub activation_method: ActivationFilter,
    /// Cap on spectra loaded per invocation; `0` disables the cap.
    pub spectrum_batch_size: usize,
    /// Scope of the run over the scan stream.
    pub analysis_type: AnalysisType,
    /// First scan number, used by `SpecificScan`/`SpecificScanRange`.
    pub first_scan: i32,
    /// Last scan number, used by `SpecificScanRange`.
    pub last_scan: i32,
    /// Input format family.
    pub input_type: InputType,
    /// Worker thread count for the preprocessing pool.
    pub num_threads: usize,
    /// Whether per-scan `.out` files are written by some other stage of the pipeline
    /// (the core never writes them itself; this only gates the skip-existing check).
    pub output_out_files: bool,
    /// Skip (scan, charge) pairs whose `.out` file already exists.
    pub skip_already_done: bool,
    /// Whether results are also streamed elsewhere, which disables the skip check
    /// (no on-disk artifact to check against).
    pub any_stream_output: bool,
    /// Base directory for composing the skip-existing-output path.
    pub base_dir: String,
    /// Base file name for composing the skip-existing-output path.
    pub base_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            inverse_bin_width: 1.0005,
            bin_offset: 0.4,
            high_peptide_mass: 5000.0,
            low_peptide_mass: 0.0,
            min_intensity: 0.0,
            min_peaks: 10,
            clear_mz_range: None,
            remove_precursor: RemovePrecursorPolicy::Accept,
            remove_precursor_tol: 1.5,
            start_charge: 0,
            end_charge: 0,
            override_charge: false,
            max_precursor_charge: 6,
            max_fragment_charge: 3,
            use_neutral_loss: true,
            ion_series: IonSeries::default(),
            theoretical_fragment_ions: 0,
            sparse_matrix_enabled: false,
            fragment_bin_size: 1.0005,
            tolerance_units: ToleranceUnits::Ppm,
            tolerance_type: ToleranceType::Peptide,
            input_tolerance: 20.0,
            isotope_error: IsotopeError::Zero,
            activation_method: ActivationFilter::All,
            spectrum_batch_size: 0,
            analysis_type: AnalysisType::EntireFile,
            first_scan: 0,
            last_scan: 0,
            input_type: InputType::Other,
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            output_out_files: false,
            skip_already_done: false,
            any_stream_output: false,
            base_dir: ".".to_string(),
            base_name: "search".to_string(),
        }
    }
}

/// Partial TOML overlay: every field optional, merged field-by-field over the
/// compiled-in defaults. Mirrors the teacher crate's `WriterConfig`/`ReaderConfig`
/// "defaults, then merge a deserialized overlay" layering.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConfigOverlay {
    pub inverse_bin_width: Option<f64>,
    pub bin_offset: Option<f64>,
    pub high_peptide_mass: Option<f64>,
    pub low_peptide_mass: Option<f64>,
    pub min_intensity: Option<f64>,
    pub min_peaks: Option<usize>,
    pub clear_mz_range: Option<ClearMzRange>,
    pub remove_precursor_code: Option<i32>,
    pub remove_precursor_tol: Option<f64>,
    pub start_charge: Option<i32>,
    pub end_charge: Option<i32>,
    pub override_charge: Option<bool>,
    pub max_precursor_charge: Option<i32>,
    pub max_fragment_charge: Option<i32>,
    pub use_neutral_loss: Option<bool>,
    pub ion_series: Option<IonSeries>,
    pub theoretical_fragment_ions: Option<i32>,
    pub sparse_matrix_enabled: Option<bool>,
    pub fragment_bin_size: Option<f64>,
    pub tolerance_units: Option<ToleranceUnits>,
    pub tolerance_type: Option<ToleranceType>,
    pub input_tolerance: Option<f64>,
    pub isotope_error_code: Option<i32>,
    pub activation_method: Option<ActivationFilter>,
    pub spectrum_batch_size: Option<usize>,
    pub analysis_type: Option<AnalysisType>,
    pub first_scan: Option<i32>,
    pub last_scan: Option<i32>,
    pub input_type: Option<InputType>,
    pub num_threads: Option<usize>,
    pub output_out_files: Option<bool>,
    pub skip_already_done: Option<bool>,
    pub any_stream_output: Option<bool>,
    pub base_dir: Option<String>,
    pub base_name: Option<String>,
}

impl Config {
    /// Load the default configuration, overlay an optional TOML file, and validate.
    pub fn load(overlay_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(path) = overlay_path {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let overlay: ConfigOverlay = toml::from_str(&text)?;
            config.merge(overlay)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Merge a parsed overlay over `self`, field by field; absent fields keep the
    /// current (default) value.
    pub fn merge(&mut self, overlay: ConfigOverlay) -> Result<(), ConfigError> {
        macro_rules! take {
            ($field:ident) => {
                if let Some(value) = overlay.$field {
                    self.$field = value;
                }
            };
        }
        take!(inverse_bin_width);
        take!(bin_offset);
        take!(high_peptide_mass);
        take!(low_peptide_mass);
        take!(min_intensity);
        take!(min_peaks);
        take!(clear_mz_range);
        take!(remove_precursor_tol);
        take!(start_charge);
        take!(end_charge);
        take!(override_charge);
        take!(max_precursor_charge);
        take!(max_fragment_charge);
        take!(use_neutral_loss);
        take!(ion_series);
        take!(theoretical_fragment_ions);
        take!(sparse_matrix_enabled);
        take!(fragment_bin_size);
        take!(tolerance_units);
        take!(tolerance_type);
        take!(input_tolerance);
        take!(activation_method);
        take!(spectrum_batch_size);
        take!(analysis_type);
        take!(first_scan);
        take!(last_scan);
        take!(input_type);
        take!(num_threads);
        take!(output_out_files);
        take!(skip_already_done);
        take!(any_stream_output);
        take!(base_dir);
        take!(base_name);
        if let Some(code) = overlay.isotope_error_code {
            self.isotope_error = crate::config::IsotopeError::from_code(code)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        if let Some(code) = overlay.remove_precursor_code {
            self.remove_precursor = RemovePrecursorPolicy::from_code(code)?;
        }
        Ok(())
    }

    /// Reject field combinations that would be unsafe for the rest of the pipeline
    /// to run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_threads == 0 {
            return Err(ConfigError::Invalid(
                "num_threads must be at least 1".to_string(),
            ));
        }
        if self.low_peptide_mass > 0.0 && self.high_peptide_mass <= self.low_peptide_mass {
            return Err(ConfigError::Invalid(format!(
                "high_peptide_mass ({}) must exceed low_peptide_mass ({})",
                self.high_peptide_mass, self.low_peptide_mass
            )));
        }
        if self.remove_precursor_tol < 0.0 {
            return Err(ConfigError::Invalid(
                "remove_precursor_tol must be non-negative".to_string(),
            ));
        }
        if self.input_tolerance < 0.0 {
            return Err(ConfigError::Invalid(
                "input_tolerance must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Maximum array size the buffer pool must size its scratch buffers to, derived
    /// from `high_peptide_mass` the same way a per-query `array_size` is derived from
    /// `exp_pep_mass` (§3).
    pub fn max_array_size(&self) -> usize {
        (((self.high_peptide_mass + 100.0) * self.inverse_bin_width).floor()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_threads() {
        let mut config = Config::default();
        config.num_threads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_mass_range() {
        let mut config = Config::default();
        config.low_peptide_mass = 4000.0;
        config.high_peptide_mass = 3000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn overlay_merges_only_present_fields() {
        let mut config = Config::default();
        let overlay = ConfigOverlay {
            num_threads: Some(4),
            ..Default::default()
        };
        config.merge(overlay).unwrap();
        assert_eq!(config.num_threads, 4);
        // untouched field keeps its default
        assert_eq!(config.bin_offset, 0.4);
    }

    #[test]
    fn overlay_from_toml_text() {
        let mut config = Config::default();
        let overlay: ConfigOverlay = toml::from_str(
            r#"
            num_threads = 8
            sparse_matrix_enabled = true
            tolerance_units = "ppm"
            activation_method = "HCD"
            "#,
        )
        .unwrap();
        config.merge(overlay).unwrap();
        assert_eq!(config.num_threads, 8);
        assert!(config.sparse_matrix_enabled);
        assert_eq!(
            config.activation_method,
            ActivationFilter::Only(ActivationMethod::Hcd)
        );
    }

    #[test]
    fn isotope_error_code_round_trips() {
        assert!(matches!(IsotopeError::from_code(0), Ok(IsotopeError::Zero)));
        assert!(matches!(IsotopeError::from_code(1), Ok(IsotopeError::One)));
        assert!(matches!(IsotopeError::from_code(2), Ok(IsotopeError::Two)));
        assert!(IsotopeError::from_code(3).is_err());
    }
}
