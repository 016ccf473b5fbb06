//! # xcorrprep
//!
//! A command-line tool that runs the spectrum-preprocessing pipeline used ahead
//! of a tandem mass-spectrometry database search: binning, fast
//! cross-correlation and Sp-score vectors, charge inference, and tolerance
//! resolution, driven by a multi-threaded producer/consumer pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Run a synthetic demo scan stream end to end
//! xcorrprep demo --scan-count 500
//!
//! # Preprocess an input against the resolved configuration
//! xcorrprep preprocess input.raw --config xcorrprep.toml
//!
//! # Inspect the configuration a run would use
//! xcorrprep info --config xcorrprep.toml
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
