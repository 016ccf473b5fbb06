//! The externally-consumed scan reader interface (§6).
//!
//! Real instrument-format parsing (mzML, mzXML, Thermo RAW, ...) is out of scope;
//! this trait is the seam a real reader would plug into. [`crate::demo::DemoScanSource`]
//! is the only implementation this crate ships.

use crate::error::ReaderError;
use crate::spectrum::Spectrum;

/// A sequential source of MS/MS spectra, consumed by the intake loop (§4.8).
pub trait ScanSource {
    /// Position the reader at `hint_scan` (or the first available scan) and
    /// return its spectrum. Called exactly once, before any [`read_next`](Self::read_next).
    fn read(&mut self, hint_scan: i32) -> Result<Spectrum, ReaderError>;

    /// Return the next spectrum in sequence. May return a spectrum with
    /// `scan_number == 0` to signal "no useful scan at this position" (§4.8).
    fn read_next(&mut self) -> Result<Spectrum, ReaderError>;

    /// The highest scan number in the underlying source.
    fn last_scan(&self) -> i32;
}
