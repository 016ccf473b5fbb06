//! Persistent worker-thread pool fed by a bounded channel, generalizing the
//! teacher crate's single-background-thread async writer to `N` workers (§5).

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::buffer_pool::BufferPool;
use crate::config::Config;
use crate::preprocessor::preprocess_spectrum;
use crate::shared_state::{ErrorSink, MaxFragmentCharge, ResultQueue};
use crate::spectrum::Spectrum;

/// `N` persistent worker threads draining a depth-1 bounded channel, so at most
/// one task can sit queued ahead of what the workers are already running (§5).
pub struct WorkerPool {
    sender: Option<Sender<Spectrum>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `config.num_threads` workers sharing `pool`/`results`/`max_fragment_charge`/`errors`.
    pub fn new(
        config: Arc<Config>,
        pool: BufferPool,
        results: ResultQueue,
        max_fragment_charge: MaxFragmentCharge,
        errors: ErrorSink,
    ) -> Self {
        let (sender, receiver): (Sender<Spectrum>, Receiver<Spectrum>) = bounded(1);
        let handles = (0..config.num_threads)
            .map(|worker_id| {
                let receiver = receiver.clone();
                let config = Arc::clone(&config);
                let pool = pool.clone();
                let results = results.clone();
                let max_fragment_charge = max_fragment_charge.clone();
                let errors = errors.clone();
                thread::Builder::new()
                    .name(format!("xcorrprep-worker-{worker_id}"))
                    .spawn(move || {
                        for spectrum in receiver.iter() {
                            preprocess_spectrum(&spectrum, &config, &pool, &results, &max_fragment_charge, &errors);
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();

        WorkerPool {
            sender: Some(sender),
            handles,
        }
    }

    /// Dispatch a spectrum for preprocessing. Blocks if the channel's single
    /// queued-task slot is already occupied (the intake loop's backpressure point).
    pub fn dispatch(&self, spectrum: Spectrum) {
        if let Some(sender) = &self.sender {
            // A disconnected receiver can only mean every worker panicked; the
            // error sink is the channel callers are expected to check instead.
            let _ = sender.send(spectrum);
        }
    }

    /// Close the dispatch channel and block until every worker has drained it
    /// and exited (`pool.waitAll()`, §4.8).
    pub fn wait_all(mut self) {
        self.sender.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.sender.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
