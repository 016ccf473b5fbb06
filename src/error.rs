//! Error types for the preprocessing engine, one enum per concern.

/// Errors raised while assembling or validating a [`crate::config::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML overlay file could not be read from disk.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML overlay file did not parse.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A validated field combination is unsafe to run with.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by [`crate::buffer_pool::BufferPool`].
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Every slot was busy when `acquire` was called. The dispatcher's own
    /// backpressure must prevent this; reaching it is a bookkeeping bug, not a
    /// recoverable condition.
    #[error("buffer pool exhausted: all slots busy")]
    PoolExhausted,
}

/// Errors raised by a [`crate::scan_source::ScanSource`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The underlying data source failed (I/O, malformed record, end of stream
    /// reached unexpectedly).
    #[error("scan source error: {0}")]
    Source(String),
}

/// Errors raised while preprocessing a single spectrum/charge pair.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// A large scratch or output buffer could not be allocated.
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    /// `isotopeError` was outside `{0,1,2}`.
    #[error("invalid isotope error setting: {0}")]
    InvalidIsotopeError(i32),

    /// The buffer pool reported exhaustion while this spectrum was in flight.
    #[error("buffer pool error: {0}")]
    Pool(#[from] PoolError),

    /// The scan reader failed while producing the spectrum being processed.
    #[error("reader error: {0}")]
    Reader(#[from] ReaderError),
}
