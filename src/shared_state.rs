//! Process-wide shared state the worker pool and intake loop coordinate through:
//! the result queue, the monotone max-fragment-charge counter, and the fail-fast
//! error sink (§3 "Global aggregates", §5).
//!
//! Each piece of state gets its own mutex, following the teacher crate's
//! `first_error: Arc<Mutex<Option<String>>>` pattern of one small, independently
//! lockable cell per concern rather than a single coarse-grained lock.

use std::sync::{Arc, Mutex};

use crate::error::PreprocessError;
use crate::query::Query;

/// Append-only collector for [`Query`] results produced by the worker pool.
#[derive(Clone, Default)]
pub struct ResultQueue {
    inner: Arc<Mutex<Vec<Query>>>,
}

impl ResultQueue {
    /// An empty queue.
    pub fn new() -> Self {
        ResultQueue::default()
    }

    /// Append a query. Not ordered relative to scan number — callers must not
    /// assume anything about the order results arrive in (§5).
    pub fn push(&self, query: Query) {
        self.inner.lock().unwrap().push(query);
    }

    /// Number of queries appended so far.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Consume the queue, returning everything appended.
    pub fn into_vec(self) -> Vec<Query> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner().unwrap())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone())
    }
}

/// Monotone non-decreasing counter for the highest fragment-ion charge observed
/// across every processed spectrum.
#[derive(Clone, Default)]
pub struct MaxFragmentCharge {
    inner: Arc<Mutex<i32>>,
}

impl MaxFragmentCharge {
    /// Starts at `0`.
    pub fn new() -> Self {
        MaxFragmentCharge::default()
    }

    /// Raise the observed maximum to `candidate` if it's higher than the current value.
    pub fn observe(&self, candidate: i32) {
        let mut guard = self.inner.lock().unwrap();
        if candidate > *guard {
            *guard = candidate;
        }
    }

    /// Current observed maximum.
    pub fn get(&self) -> i32 {
        *self.inner.lock().unwrap()
    }
}

/// First-error-wins latch the worker pool uses to signal the intake loop to stop.
#[derive(Clone, Default)]
pub struct ErrorSink {
    inner: Arc<Mutex<Option<PreprocessError>>>,
}

impl ErrorSink {
    /// Starts clear.
    pub fn new() -> Self {
        ErrorSink::default()
    }

    /// Latch `error` if nothing has been recorded yet; later calls are ignored.
    pub fn set_error(&self, error: PreprocessError) {
        let mut guard = self.inner.lock().unwrap();
        if guard.is_none() {
            log::error!("{error}");
            *guard = Some(error);
        }
    }

    /// True once any error has been latched.
    pub fn has_error(&self) -> bool {
        self.inner.lock().unwrap().is_some()
    }

    /// The latched error's display message, if any.
    pub fn message(&self) -> Option<String> {
        self.inner.lock().unwrap().as_ref().map(|e| e.to_string())
    }
}
