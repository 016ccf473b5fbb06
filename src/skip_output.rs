//! Skip-existing-output path composition and check (§6).

use std::path::PathBuf;

use crate::config::Config;

/// Compose the per-`(scan, charge)` output path the original `.out`-file pipeline
/// would have written, using the platform path separator.
pub fn output_path(config: &Config, scan: i32, charge: i32) -> PathBuf {
    PathBuf::from(&config.base_dir).join(format!(
        "{}.{scan:05}.{scan:05}.{charge}.out",
        config.base_name
    ))
}

/// True iff this `(scan, charge)` pair should be skipped: `.out`-file writing and
/// the skip check are both enabled, no other stream consumes the output, and the
/// composed path already exists and is openable for read (§6, scenario S7).
pub fn should_skip(config: &Config, scan: i32, charge: i32) -> bool {
    if !(config.output_out_files && config.skip_already_done && !config.any_stream_output) {
        return false;
    }
    std::fs::File::open(output_path(config, scan, charge)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_uses_configured_base_dir_and_name() {
        let mut config = Config::default();
        config.base_dir = "/tmp/search-out".to_string();
        config.base_name = "sample".to_string();
        let path = output_path(&config, 42, 2);
        assert_eq!(path, PathBuf::from("/tmp/search-out/sample.00042.00042.2.out"));
    }

    #[test]
    fn disabled_by_default() {
        let config = Config::default();
        assert!(!should_skip(&config, 1, 2));
    }

    #[test]
    fn s7_skips_when_file_exists_and_no_stream_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.base_dir = dir.path().to_string_lossy().to_string();
        config.base_name = "sample".to_string();
        config.output_out_files = true;
        config.skip_already_done = true;

        assert!(!should_skip(&config, 7, 2));

        std::fs::write(output_path(&config, 7, 2), b"existing").unwrap();
        assert!(should_skip(&config, 7, 2));
    }

    #[test]
    fn any_stream_output_disables_skip_even_if_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.base_dir = dir.path().to_string_lossy().to_string();
        config.output_out_files = true;
        config.skip_already_done = true;
        config.any_stream_output = true;

        std::fs::write(output_path(&config, 1, 1), b"existing").unwrap();
        assert!(!should_skip(&config, 1, 1));
    }
}
