//! # Candidate Generation
//!
//! Deterministic enumeration of candidate passwords under a [`PasswordPolicy`] and
//! a [`GenerationBudget`].
//!
//! Lengths are walked in ascending order. Each length gets one
//! [`EnumerationStrategy`], which expands into labelled passes; each pass is an
//! [`Odometer`] run. Re-running with the same inputs yields the same sequence.
//!
//! Cancellation is cooperative: the [`CancelToken`] is checked at every progress
//! checkpoint, and a cancelled run returns what it emitted so far.

pub mod budget;
pub mod odometer;
pub mod strategy;
pub mod task;

pub use budget::{
    combinations, estimate_count, estimate_count_within, space_size, GenerationBudget,
};
pub use odometer::Odometer;
pub use strategy::{EnumerationStrategy, Pass};
pub use task::GenerationTask;

use crate::cancel::{CancelReason, CancelToken};
use crate::consts::{
    DEFAULT_MAX_CANDIDATES, MAX_PROGRESS_INTERVAL, PATTERN_INTERVAL_FACTOR, PROGRESS_TICKS,
};
use crate::memory::MemorySample;
use crate::policy::PasswordPolicy;
use tracing::debug;

/// Receives generation events on the generating thread.
///
/// Every method defaults to a no-op.
pub trait GenerationObserver {
    /// `(emitted, estimate)` at roughly every 1% of the estimate.
    fn on_progress(&mut self, _emitted: u64, _estimate: u128) {}

    /// Label of the structural group being emitted.
    fn on_pattern(&mut self, _label: &str) {}

    /// Memory crossed the warning threshold while generating.
    fn on_memory_warning(&mut self, _sample: &MemorySample) {}
}

impl GenerationObserver for () {}

impl<O: GenerationObserver + ?Sized> GenerationObserver for &mut O {
    fn on_progress(&mut self, emitted: u64, estimate: u128) {
        (**self).on_progress(emitted, estimate);
    }

    fn on_pattern(&mut self, label: &str) {
        (**self).on_pattern(label);
    }

    fn on_memory_warning(&mut self, sample: &MemorySample) {
        (**self).on_memory_warning(sample);
    }
}

/// How a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Every pass of every length ran to the end.
    Complete,
    /// The hard cap stopped enumeration; the batch is a valid prefix.
    BudgetReached,
    /// The cancel token was set; the batch is whatever was emitted.
    Cancelled(CancelReason),
}

/// The ordered candidates produced by one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBatch {
    candidates: Vec<String>,
    total_estimate: u128,
    outcome: GenerationOutcome,
}

impl CandidateBatch {
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    #[must_use]
    pub fn into_candidates(self) -> Vec<String> {
        self.candidates
    }

    #[must_use]
    pub fn emitted_count(&self) -> u64 {
        self.candidates.len() as u64
    }

    #[must_use]
    pub const fn total_estimate(&self) -> u128 {
        self.total_estimate
    }

    #[must_use]
    pub const fn outcome(&self) -> GenerationOutcome {
        self.outcome
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Progress fires every `max(1, min(10_000, estimate / 100))` candidates.
#[must_use]
pub fn progress_interval(estimate: u128) -> u64 {
    let per_tick = (estimate / PROGRESS_TICKS).min(u128::from(MAX_PROGRESS_INTERVAL));
    // per_tick ≤ MAX_PROGRESS_INTERVAL, so the cast is lossless
    (per_tick as u64).max(1)
}

/// Enumerate candidates for `policy` under `budget`.
///
/// Never fails: an exhausted budget and a cancelled token are both normal
/// outcomes reported through [`CandidateBatch::outcome`].
pub fn generate<O: GenerationObserver>(
    policy: &PasswordPolicy,
    budget: GenerationBudget,
    mut observer: O,
    cancel: &CancelToken,
) -> CandidateBatch {
    let charset = policy.charset();
    let estimate = estimate_count_within(policy, budget);
    let progress_every = progress_interval(estimate);
    let pattern_every = progress_every.saturating_mul(PATTERN_INTERVAL_FACTOR);

    // Unlimited estimates can dwarf memory; grow past the default cap on demand
    let capacity =
        usize::try_from(estimate.min(u128::from(DEFAULT_MAX_CANDIDATES))).unwrap_or(0);
    let mut candidates: Vec<String> = Vec::with_capacity(capacity);
    let mut emitted: u64 = 0;

    let finish = |candidates: Vec<String>, outcome| CandidateBatch {
        candidates,
        total_estimate: estimate,
        outcome,
    };

    observer.on_progress(0, estimate);

    if budget.is_exhausted_by(emitted) {
        debug!("generation budget is zero");
        return finish(candidates, GenerationOutcome::BudgetReached);
    }

    for length in policy.lengths() {
        let combos = combinations(charset.len(), length);
        let strategy = EnumerationStrategy::select(length, combos, emitted, budget);
        debug!(length, ?strategy, emitted, "selected enumeration strategy");

        for pass in strategy.passes(length, &charset) {
            observer.on_pattern(&pass.label);

            for candidate in pass.candidates() {
                candidates.push(candidate);
                emitted += 1;

                if emitted % progress_every == 0 {
                    observer.on_progress(emitted, estimate);
                    if let Some(reason) = cancel.reason() {
                        debug!(emitted, %reason, "generation cancelled");
                        return finish(candidates, GenerationOutcome::Cancelled(reason));
                    }
                }

                if emitted % pattern_every == 0 {
                    observer.on_pattern(&pass.label);
                    if let Some(reason) = cancel.reason() {
                        debug!(emitted, %reason, "generation cancelled");
                        return finish(candidates, GenerationOutcome::Cancelled(reason));
                    }
                }

                if budget.is_exhausted_by(emitted) {
                    observer.on_progress(emitted, estimate);
                    debug!(emitted, "generation budget reached");
                    return finish(candidates, GenerationOutcome::BudgetReached);
                }
            }
        }
    }

    observer.on_progress(emitted, estimate);
    finish(candidates, GenerationOutcome::Complete)
}
