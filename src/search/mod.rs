//! # Search
//!
//! Tests a materialised candidate list against a [`DocumentDecryptor`] on a
//! worker thread, strictly in order.
//!
//! The worker walks the list in batches of 100. Batch boundaries are the only
//! places it honours `pause` and `cancel`, so the persisted cursor always points
//! at the first untested candidate: resuming never retests and never skips.
//!
//! ```no_run
//! use aescrypt_recover::{
//!     generate, AescryptDocument, GenerationBudget, MemoryCeiling, MemoryGovernor,
//!     PolicyBuilder, SearchController, SearchResult,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = PolicyBuilder::new().with_lengths(3, 3).build()?;
//! let batch = generate(&policy, GenerationBudget::for_policy(&policy), (), &Default::default());
//! let doc = AescryptDocument::open("secret.aes")?;
//!
//! let search = SearchController::new();
//! search.start(
//!     batch.into_candidates(),
//!     doc,
//!     (),
//!     MemoryGovernor::for_process(MemoryCeiling::detect()),
//! )?;
//! if let SearchResult::Found(password) = search.wait()? {
//!     println!("{password}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod state;

pub use state::SearchResult;

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cancel::CancelReason;
use crate::consts::{SEARCH_BATCH_SIZE, SEARCH_MEMORY_POLL_INTERVAL, SEARCH_SAMPLE_INTERVAL};
use crate::document::DocumentDecryptor;
use crate::error::RecoveryError;
use crate::memory::{MemoryGovernor, MemorySample, MemorySampler, Phase};
use crate::utils::percent;
use state::Shared;

/// Receives search events on the worker thread, in emission order.
///
/// Every method defaults to a no-op.
pub trait SearchObserver: Send {
    /// Percent of the list tested, after every batch.
    fn on_progress(&mut self, _percent: u8) {}

    /// A sample of the candidate about to be tested (every 10th index).
    fn on_testing(&mut self, _candidate: &str) {}

    fn on_memory_warning(&mut self, _sample: &MemorySample) {}

    /// `Found` or `NotFound`. Cancelled runs end silently.
    fn on_finished(&mut self, _result: &SearchResult) {}
}

impl SearchObserver for () {}

impl<O: SearchObserver + ?Sized> SearchObserver for Box<O> {
    fn on_progress(&mut self, percent: u8) {
        (**self).on_progress(percent);
    }

    fn on_testing(&mut self, candidate: &str) {
        (**self).on_testing(candidate);
    }

    fn on_memory_warning(&mut self, sample: &MemorySample) {
        (**self).on_memory_warning(sample);
    }

    fn on_finished(&mut self, result: &SearchResult) {
        (**self).on_finished(result);
    }
}

/// Owns one search run and the controls for it.
///
/// `pause`, `resume` and `cancel` take `&self` and may be called from any
/// thread, any number of times. Dropping the controller cancels a running
/// worker.
#[derive(Debug)]
pub struct SearchController {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    /// A controller that starts at the first candidate.
    #[must_use]
    pub fn new() -> Self {
        Self::resuming_at(0)
    }

    /// A controller that starts at `cursor`, e.g. a cursor persisted by an
    /// earlier run over the same candidate list.
    #[must_use]
    pub fn resuming_at(cursor: usize) -> Self {
        Self {
            shared: Arc::new(Shared::starting_at(cursor)),
            worker: Mutex::new(None),
        }
    }

    /// Spawn the worker. A controller runs at most once.
    pub fn start<C, D, O, S>(
        &self,
        candidates: C,
        decryptor: D,
        observer: O,
        governor: MemoryGovernor<S>,
    ) -> Result<(), RecoveryError>
    where
        C: Into<Arc<[String]>>,
        D: DocumentDecryptor + Send + 'static,
        O: SearchObserver + 'static,
        S: MemorySampler + 'static,
    {
        {
            let mut state = self.shared.lock();
            if state.result != SearchResult::NotStarted {
                return Err(RecoveryError::SearchAlreadyStarted);
            }
            state.result = SearchResult::Searching;
        }

        let worker = Worker {
            shared: self.shared.clone(),
            candidates: candidates.into(),
            decryptor,
            observer,
            governor,
        };
        info!(
            candidates = worker.candidates.len(),
            ceiling = %worker.governor.ceiling(),
            "search started"
        );

        let spawned = thread::Builder::new()
            .name("password-search".into())
            .spawn(move || worker.run());
        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.lock().result = SearchResult::NotStarted;
                Err(e.into())
            }
        }
    }

    /// Hold the worker at its next batch boundary. No-op once cancelled or finished.
    pub fn pause(&self) {
        let mut state = self.shared.lock();
        if state.cancelled.is_none() && !state.result.is_terminal() {
            state.paused = true;
        }
    }

    pub fn resume(&self) {
        self.shared.lock().paused = false;
        self.shared.notify_all();
    }

    /// Stop at the next batch boundary with [`CancelReason::Requested`].
    /// Also releases a paused worker.
    pub fn cancel(&self) {
        self.cancel_for(CancelReason::Requested);
    }

    fn cancel_for(&self, reason: CancelReason) {
        {
            let mut state = self.shared.lock();
            if state.result.is_terminal() {
                return;
            }
            state.cancelled.get_or_insert(reason);
            state.paused = false;
        }
        self.shared.notify_all();
    }

    /// Index of the next untested candidate.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.shared.lock().cursor
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    #[must_use]
    pub fn result(&self) -> SearchResult {
        self.shared.lock().result.clone()
    }

    /// Join the worker and return the final result.
    ///
    /// Without a prior `start` this returns [`SearchResult::NotStarted`] at once.
    pub fn wait(&self) -> Result<SearchResult, RecoveryError> {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| RecoveryError::WorkerPanicked("search"))?;
        }
        Ok(self.result())
    }

    /// The final result, or `None` if the worker is still going after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SearchResult> {
        self.shared.wait_terminal(timeout)
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Worker<D, O, S> {
    shared: Arc<Shared>,
    candidates: Arc<[String]>,
    decryptor: D,
    observer: O,
    governor: MemoryGovernor<S>,
}

impl<D, O, S> Worker<D, O, S>
where
    D: DocumentDecryptor,
    O: SearchObserver,
    S: MemorySampler,
{
    fn run(mut self) {
        let candidates = Arc::clone(&self.candidates);
        let total = candidates.len();
        let mut since_poll = 0usize;

        loop {
            let start = {
                let mut state = self.shared.wait_unpaused();
                if let Some(reason) = state.cancelled {
                    state.result = SearchResult::Cancelled(reason);
                    drop(state);
                    self.shared.notify_all();
                    info!(%reason, "search cancelled");
                    return;
                }
                state.cursor
            };

            if start >= total {
                self.finish(SearchResult::NotFound, total);
                return;
            }

            let end = start.saturating_add(SEARCH_BATCH_SIZE).min(total);
            let mut stopped_at = None;
            for index in start..end {
                let candidate = &candidates[index];
                if index % SEARCH_SAMPLE_INTERVAL == 0 {
                    self.observer.on_testing(candidate);
                }

                match self.decryptor.try_password(candidate) {
                    Ok(true) => {
                        self.observer.on_progress(100);
                        self.finish(SearchResult::Found(candidate.clone()), index);
                        return;
                    }
                    Ok(false) => {}
                    Err(e) => warn!(index, error = %e, "decryption attempt failed"),
                }

                since_poll += 1;
                if since_poll >= SEARCH_MEMORY_POLL_INTERVAL {
                    since_poll = 0;
                    if self.poll_memory() {
                        stopped_at = Some(index + 1);
                        break;
                    }
                }
            }

            if let Some(cursor) = stopped_at {
                // cut short mid-batch; the top of the loop reports the cancellation
                self.shared.lock().cursor = cursor;
                continue;
            }

            self.shared.lock().cursor = end;
            let cursor = end;
            self.observer.on_progress(percent(cursor, total));
            debug!(cursor, total, "search batch checkpoint");
        }
    }

    /// Returns `true` when the sample forced a cancellation.
    fn poll_memory(&mut self) -> bool {
        let sample = self.governor.sample(Phase::Search);
        if sample.is_critical() {
            warn!(
                resident_mb = ?sample.resident_mb,
                ceiling_mb = sample.ceiling_mb,
                "memory ceiling reached during search; cancelling"
            );
            self.observer.on_memory_warning(&sample);
            let mut state = self.shared.lock();
            state.cancelled.get_or_insert(CancelReason::MemoryExhausted);
            state.paused = false;
            return true;
        }
        if sample.is_warning() {
            warn!(
                resident_mb = ?sample.resident_mb,
                ceiling_mb = sample.ceiling_mb,
                "high memory usage during search"
            );
            self.observer.on_memory_warning(&sample);
        }
        false
    }

    fn finish(&mut self, result: SearchResult, cursor: usize) {
        {
            let mut state = self.shared.lock();
            state.cursor = cursor;
            state.result = result.clone();
        }
        self.shared.notify_all();
        info!(%result, cursor, "search finished");
        self.observer.on_finished(&result);
    }
}
