//! Spectrum-preprocessing engine for tandem mass-spectrometry database search:
//! binning, fast cross-correlation and Sp-score vectors, charge inference,
//! tolerance resolution, and a multi-threaded producer/consumer pipeline with a
//! reusable scratch-buffer pool.
//!
//! The pipeline stages compose roughly in this order for each admitted spectrum:
//! [`scan_source`] → [`charge_inference`] → [`tolerance`] → [`signal_ops`] (via
//! [`preprocessor`]) → [`sparse_builder`] → [`query::Query`], appended to a
//! [`shared_state::ResultQueue`] by one of the [`worker_pool::WorkerPool`]'s
//! workers under backpressure from the [`intake`] loop.

pub mod bin_math;
pub mod buffer_pool;
pub mod charge_inference;
pub mod config;
pub mod constants;
pub mod demo;
pub mod error;
pub mod intake;
pub mod preprocessor;
pub mod query;
pub mod scan_source;
pub mod shared_state;
pub mod signal_ops;
pub mod skip_output;
pub mod sparse_builder;
pub mod spectrum;
pub mod tolerance;
pub mod worker_pool;

pub use config::Config;
pub use error::PreprocessError;
pub use query::Query;
pub use spectrum::Spectrum;
