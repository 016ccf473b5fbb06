//! Synthetic in-memory [`ScanSource`] for smoke-testing without external data,
//! adapted from the teacher crate's `demo` subcommand (mock LC-MS generation)
//! to "produce a deterministic stream of MS2 scans in memory" (§4.11).

use crate::config::ActivationMethod;
use crate::error::ReaderError;
use crate::scan_source::ScanSource;
use crate::spectrum::{Peak, Spectrum};

/// Deterministically generates `scan_count` synthetic MS2 spectra, in ascending
/// scan-number order, with no I/O involved.
pub struct DemoScanSource {
    scan_count: i32,
    position: i32,
}

impl DemoScanSource {
    /// A source that will yield `scan_count` spectra, numbered `1..=scan_count`.
    pub fn new(scan_count: i32) -> Self {
        DemoScanSource {
            scan_count,
            position: 0,
        }
    }

    fn spectrum_for(&self, scan_number: i32) -> Spectrum {
        let precursor_mz = 400.0 + (scan_number as f64 * 0.789).sin().abs() * 1200.0;
        let num_fragments = 40 + (scan_number % 60) as usize;

        let peaks = (0..num_fragments)
            .map(|i| {
                let mz = 100.0 + (i as f64 / num_fragments as f64) * (precursor_mz - 150.0);
                let intensity = 1e4 * (0.2 + (i as f64 * 0.321 + scan_number as f64).sin().abs() * 0.8);
                Peak { mz, intensity }
            })
            .collect();

        Spectrum::new(
            scan_number,
            precursor_mz,
            ActivationMethod::Hcd,
            scan_number as f64 * 0.6,
            peaks,
            vec![],
            format!("demo.{scan_number}.{scan_number}.0"),
        )
    }
}

impl ScanSource for DemoScanSource {
    fn read(&mut self, hint_scan: i32) -> Result<Spectrum, ReaderError> {
        let scan_number = hint_scan.max(1);
        self.position = scan_number;
        if scan_number > self.scan_count {
            return Ok(self.sentinel());
        }
        Ok(self.spectrum_for(scan_number))
    }

    fn read_next(&mut self) -> Result<Spectrum, ReaderError> {
        self.position += 1;
        if self.position > self.scan_count {
            return Ok(self.sentinel());
        }
        Ok(self.spectrum_for(self.position))
    }

    fn last_scan(&self) -> i32 {
        self.scan_count
    }
}

impl DemoScanSource {
    fn sentinel(&self) -> Spectrum {
        Spectrum::new(0, 0.0, ActivationMethod::Na, 0.0, vec![], vec![], "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_requested_scan_count_then_sentinel() {
        let mut source = DemoScanSource::new(3);
        let first = source.read(1).unwrap();
        assert_eq!(first.scan_number, 1);
        assert_eq!(source.read_next().unwrap().scan_number, 2);
        assert_eq!(source.read_next().unwrap().scan_number, 3);
        assert_eq!(source.read_next().unwrap().scan_number, 0);
    }

    #[test]
    fn last_scan_matches_configured_count() {
        let source = DemoScanSource::new(42);
        assert_eq!(source.last_scan(), 42);
    }

    #[test]
    fn generated_spectra_have_nonempty_peaks() {
        let mut source = DemoScanSource::new(5);
        let spectrum = source.read(1).unwrap();
        assert!(!spectrum.is_empty());
        assert!(spectrum.peaks().iter().all(|p| p.intensity > 0.0));
    }
}
