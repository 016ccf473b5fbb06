//! Mutex-guarded scratch-buffer slots shared by every worker (§4.7).
//!
//! Mirrors the teacher crate's bounded-resource bookkeeping: a single mutex
//! guards a small `Vec` of slots, each checked out for the lifetime of one
//! in-flight task and handed back through an RAII guard on drop.

use std::sync::{Arc, Mutex};

use crate::error::PoolError;

/// The five dense `f64` scratch arrays one preprocessing task needs concurrently:
/// the raw binned spectrum, the windowed correlation data, the boxcar mean, and
/// two peak-extraction working buffers.
pub struct ScratchBuffers {
    /// `LoadIons` output / `PeakExtract` input-output.
    pub raw_data: Vec<f64>,
    /// `MakeCorrData` output.
    pub correlation_data: Vec<f64>,
    /// `boxcar_mean` output.
    pub mean_around: Vec<f64>,
    /// `PeakExtract` pass-1/pass-2 scratch.
    pub extracted: Vec<f64>,
    /// Scratch for the Sp-score working copy of `raw_data`.
    pub sp_scratch: Vec<f64>,
}

impl ScratchBuffers {
    fn new(max_array_size: usize) -> Self {
        ScratchBuffers {
            raw_data: vec![0.0; max_array_size],
            correlation_data: vec![0.0; max_array_size],
            mean_around: vec![0.0; max_array_size],
            extracted: vec![0.0; max_array_size],
            sp_scratch: vec![0.0; max_array_size],
        }
    }

    /// Zero the first `array_size` entries of every buffer. Callers must do this
    /// before reading a freshly-acquired slot; the pool reuses memory and does not
    /// clear it itself.
    pub fn zero_prefix(&mut self, array_size: usize) {
        for buf in [
            &mut self.raw_data,
            &mut self.correlation_data,
            &mut self.mean_around,
            &mut self.extracted,
            &mut self.sp_scratch,
        ] {
            buf[..array_size].fill(0.0);
        }
    }
}

struct Inner {
    slots: Vec<Option<ScratchBuffers>>,
}

/// Fixed-size pool of [`ScratchBuffers`] slots, one per configured worker thread.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<Mutex<Inner>>,
}

impl BufferPool {
    /// Allocate `slot_count` slots, each sized to `max_array_size`.
    pub fn new(slot_count: usize, max_array_size: usize) -> Self {
        let slots = (0..slot_count)
            .map(|_| Some(ScratchBuffers::new(max_array_size)))
            .collect();
        BufferPool {
            inner: Arc::new(Mutex::new(Inner { slots })),
        }
    }

    /// Check out a free slot, returning a guard that returns it to the pool on drop.
    ///
    /// Fails with [`PoolError::PoolExhausted`] only if every slot is already busy,
    /// which the dispatcher's own backpressure (at most `slot_count` in-flight
    /// tasks) must prevent from ever happening.
    pub fn acquire(&self) -> Result<PoolGuard, PoolError> {
        let mut guard = self.inner.lock().unwrap();
        let index = guard
            .slots
            .iter()
            .position(|slot| slot.is_some())
            .ok_or(PoolError::PoolExhausted)?;
        let buffers = guard.slots[index].take().unwrap();
        Ok(PoolGuard {
            pool: self.inner.clone(),
            index,
            buffers: Some(buffers),
        })
    }

    /// Number of slots in the pool.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().slots.len()
    }
}

/// RAII handle on a checked-out [`ScratchBuffers`] slot; returns it to the pool on drop.
pub struct PoolGuard {
    pool: Arc<Mutex<Inner>>,
    index: usize,
    buffers: Option<ScratchBuffers>,
}

impl std::ops::Deref for PoolGuard {
    type Target = ScratchBuffers;
    fn deref(&self) -> &ScratchBuffers {
        self.buffers.as_ref().unwrap()
    }
}

impl std::ops::DerefMut for PoolGuard {
    fn deref_mut(&mut self) -> &mut ScratchBuffers {
        self.buffers.as_mut().unwrap()
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        let buffers = self.buffers.take().unwrap();
        let mut guard = self.pool.lock().unwrap();
        guard.slots[self.index] = Some(buffers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_round_trips() {
        let pool = BufferPool::new(2, 100);
        assert_eq!(pool.len(), 2);
        {
            let _a = pool.acquire().unwrap();
            let _b = pool.acquire().unwrap();
            assert!(pool.acquire().is_err());
        }
        // both guards dropped, slots freed again
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn zero_prefix_clears_only_requested_range() {
        let pool = BufferPool::new(1, 10);
        let mut guard = pool.acquire().unwrap();
        guard.raw_data.fill(9.0);
        guard.zero_prefix(4);
        assert_eq!(&guard.raw_data[..4], &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(&guard.raw_data[4..], &[9.0; 6]);
    }

    #[test]
    fn exhaustion_then_recovery_across_threads() {
        let pool = BufferPool::new(1, 10);
        let guard = pool.acquire().unwrap();
        assert!(matches!(pool.acquire(), Err(PoolError::PoolExhausted)));
        drop(guard);
        assert!(pool.acquire().is_ok());
    }
}
