//! src/generator/task.rs
//! Off-thread generation with memory governance

use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::cancel::{CancelReason, CancelToken};
use crate::consts::GENERATION_MEMORY_POLL_INTERVAL;
use crate::error::RecoveryError;
use crate::generator::{generate, CandidateBatch, GenerationBudget, GenerationObserver};
use crate::memory::{MemoryGovernor, MemorySample, MemorySampler, Phase};
use crate::policy::PasswordPolicy;

/// A generation running on its own worker thread.
///
/// The worker polls the [`MemoryGovernor`] every 10 000 emitted candidates; a
/// critical sample cancels the run with [`CancelReason::MemoryExhausted`].
#[derive(Debug)]
pub struct GenerationTask {
    cancel: CancelToken,
    handle: JoinHandle<CandidateBatch>,
}

impl GenerationTask {
    /// Start generating `policy` under `budget` on a new thread.
    pub fn spawn<O, S>(
        policy: PasswordPolicy,
        budget: GenerationBudget,
        observer: O,
        governor: MemoryGovernor<S>,
    ) -> Result<Self, RecoveryError>
    where
        O: GenerationObserver + Send + 'static,
        S: MemorySampler + 'static,
    {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name("candidate-generation".into())
            .spawn(move || {
                let governed = Governed {
                    inner: observer,
                    governor,
                    cancel: worker_cancel.clone(),
                    next_poll: GENERATION_MEMORY_POLL_INTERVAL,
                };
                let batch = generate(&policy, budget, governed, &worker_cancel);
                info!(
                    emitted = batch.emitted_count(),
                    outcome = ?batch.outcome(),
                    "candidate generation finished"
                );
                batch
            })?;

        Ok(Self { cancel, handle })
    }

    /// Ask the worker to stop at its next checkpoint. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A handle that cancels this task from elsewhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the batch.
    pub fn join(self) -> Result<CandidateBatch, RecoveryError> {
        self.handle
            .join()
            .map_err(|_| RecoveryError::WorkerPanicked("generation"))
    }
}

/// Wraps the caller's observer and polls memory on progress checkpoints.
struct Governed<O, S> {
    inner: O,
    governor: MemoryGovernor<S>,
    cancel: CancelToken,
    next_poll: u64,
}

impl<O: GenerationObserver, S: MemorySampler> GenerationObserver for Governed<O, S> {
    fn on_progress(&mut self, emitted: u64, estimate: u128) {
        self.inner.on_progress(emitted, estimate);

        if emitted < self.next_poll {
            return;
        }
        self.next_poll = emitted.saturating_add(GENERATION_MEMORY_POLL_INTERVAL);

        let sample = self.governor.sample(Phase::Generation);
        if sample.is_critical() {
            warn!(
                resident_mb = ?sample.resident_mb,
                ceiling_mb = sample.ceiling_mb,
                "memory ceiling approached during generation; cancelling"
            );
            self.inner.on_memory_warning(&sample);
            self.cancel.cancel_for(CancelReason::MemoryExhausted);
        } else if sample.is_warning() {
            warn!(
                resident_mb = ?sample.resident_mb,
                ceiling_mb = sample.ceiling_mb,
                "high memory usage during generation"
            );
            self.inner.on_memory_warning(&sample);
        }
    }

    fn on_pattern(&mut self, label: &str) {
        self.inner.on_pattern(label);
    }

    fn on_memory_warning(&mut self, sample: &MemorySample) {
        self.inner.on_memory_warning(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationOutcome;
    use crate::memory::MemoryCeiling;
    use crate::PolicyBuilder;
    use std::sync::{Arc, Mutex};

    struct Constant(f64);

    impl MemorySampler for Constant {
        fn resident_mb(&self) -> Option<f64> {
            Some(self.0)
        }
    }

    #[derive(Clone, Default)]
    struct Warnings(Arc<Mutex<Vec<MemorySample>>>);

    impl GenerationObserver for Warnings {
        fn on_memory_warning(&mut self, sample: &MemorySample) {
            self.0.lock().unwrap().push(*sample);
        }
    }

    fn policy() -> PasswordPolicy {
        PolicyBuilder::new()
            .with_lengths(4, 4)
            .with_classes(&[crate::CharClass::Lowercase])
            .build()
            .unwrap()
    }

    #[test]
    fn critical_memory_cancels_generation() {
        let ceiling = MemoryCeiling::new(1_000).unwrap();
        let warnings = Warnings::default();
        let task = GenerationTask::spawn(
            policy(),
            GenerationBudget::Capped(100_000),
            warnings.clone(),
            MemoryGovernor::new(Constant(950.0), ceiling),
        )
        .unwrap();
        let batch = task.join().unwrap();

        assert_eq!(
            batch.outcome(),
            GenerationOutcome::Cancelled(CancelReason::MemoryExhausted)
        );
        // first poll at 10 000, cancellation lands on the next progress tick
        assert!(batch.emitted_count() <= 11_000);
        assert_eq!(warnings.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn below_generation_threshold_only_warns() {
        // 94% is below the generation threshold
        let ceiling = MemoryCeiling::new(1_000).unwrap();
        let task = GenerationTask::spawn(
            policy(),
            GenerationBudget::Capped(30_000),
            (),
            MemoryGovernor::new(Constant(940.0), ceiling),
        )
        .unwrap();
        let batch = task.join().unwrap();
        assert_eq!(batch.outcome(), GenerationOutcome::BudgetReached);
        assert_eq!(batch.emitted_count(), 30_000);
    }

    #[test]
    fn caller_cancel_before_join() {
        let task = GenerationTask::spawn(
            policy(),
            GenerationBudget::Capped(1_000_000),
            (),
            MemoryGovernor::new(Constant(1.0), MemoryCeiling::default()),
        )
        .unwrap();
        task.cancel();
        let batch = task.join().unwrap();
        // the worker may finish the 26^4 lowercase pass before it sees the token
        assert!(matches!(
            batch.outcome(),
            GenerationOutcome::Cancelled(CancelReason::Requested) | GenerationOutcome::Complete
        ));
    }
}
