//! Physical constants and numeric tolerances used throughout the preprocessing pipeline.
//!
//! Values mirror the monoisotopic masses and epsilon Comet itself uses; they are not
//! configurable because changing them would change the meaning of every downstream bin.

/// Mass of a proton, in Daltons.
pub const PROTON_MASS: f64 = 1.007_276_466_88;

/// Mass difference between carbon-13 and carbon-12, in Daltons.
pub const C13_DIFF: f64 = 1.003_354_837_8;

/// Monoisotopic mass of water, used for the -17 (NH3 loss companion) neutral-loss bin.
pub const H2O: f64 = 18.010_564_686_3;

/// Monoisotopic mass of ammonia, used for the -18 neutral-loss bin.
pub const NH3: f64 = 17.026_549_101_01;

/// Fixed epsilon for float equality comparisons across the pipeline.
pub const FLOAT_ZERO: f64 = 1e-6;

/// Number of ions retained in the preliminary (Sp) score vector.
pub const NUM_SP_IONS: usize = 200;
