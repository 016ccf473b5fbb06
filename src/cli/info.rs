//! `xcorrprep info` — print the resolved [`Config`] as TOML (§4.11).

use anyhow::{Context, Result};
use std::path::PathBuf;

use xcorrprep::config::Config;

/// Load the default config, merge an optional file, and print the result.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path.as_deref()).context("failed to load config")?;

    println!("inverse_bin_width = {}", config.inverse_bin_width);
    println!("bin_offset = {}", config.bin_offset);
    println!("high_peptide_mass = {}", config.high_peptide_mass);
    println!("low_peptide_mass = {}", config.low_peptide_mass);
    println!("min_intensity = {}", config.min_intensity);
    println!("min_peaks = {}", config.min_peaks);
    println!("remove_precursor = {:?}", config.remove_precursor);
    println!("remove_precursor_tol = {}", config.remove_precursor_tol);
    println!("max_precursor_charge = {}", config.max_precursor_charge);
    println!("max_fragment_charge = {}", config.max_fragment_charge);
    println!("use_neutral_loss = {}", config.use_neutral_loss);
    println!("sparse_matrix_enabled = {}", config.sparse_matrix_enabled);
    println!("fragment_bin_size = {}", config.fragment_bin_size);
    println!("tolerance_units = {:?}", config.tolerance_units);
    println!("tolerance_type = {:?}", config.tolerance_type);
    println!("input_tolerance = {}", config.input_tolerance);
    println!("isotope_error = {:?}", config.isotope_error);
    println!("activation_method = {:?}", config.activation_method);
    println!("analysis_type = {:?}", config.analysis_type);
    println!("num_threads = {}", config.num_threads);

    Ok(())
}
