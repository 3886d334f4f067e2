//! # Memory Governance
//!
//! Samples resident memory through an injected [`MemorySampler`] and classifies it
//! against a [`MemoryCeiling`]. Both long-running phases poll a
//! [`MemoryGovernor`]; a [`MemoryClass::Critical`] sample makes them cancel with
//! [`CancelReason::MemoryExhausted`](crate::CancelReason::MemoryExhausted).
//!
//! The critical threshold depends on the [`Phase`]: 95% of the ceiling while
//! generating, 100% while searching. Warning is 80% in both.
//!
//! A sampler that cannot measure anything yields [`MemoryClass::Normal`], so
//! monitoring never fails its caller.

pub mod procfs;

pub use procfs::ProcSampler;

use crate::consts::{
    DEFAULT_MEMORY_CEILING_MB, GENERATION_CRITICAL_PERCENT, MAX_DEFAULT_MEMORY_CEILING_MB,
    MEMORY_WARNING_PERCENT, MIN_MEMORY_CEILING_MB, SEARCH_CRITICAL_PERCENT,
};
use crate::error::RecoveryError;
use std::fmt;

/// Source of resident-memory readings.
pub trait MemorySampler: Send {
    /// Current resident set size in MB, or `None` when it cannot be measured.
    fn resident_mb(&self) -> Option<f64>;
}

impl<S: MemorySampler + Sync + ?Sized> MemorySampler for &S {
    fn resident_mb(&self) -> Option<f64> {
        (**self).resident_mb()
    }
}

impl<S: MemorySampler + ?Sized> MemorySampler for Box<S> {
    fn resident_mb(&self) -> Option<f64> {
        (**self).resident_mb()
    }
}

/// Which long-running operation is sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generation,
    Search,
}

impl Phase {
    /// Percent of the ceiling at which this phase must abort.
    #[must_use]
    pub const fn critical_percent(self) -> u32 {
        match self {
            Phase::Generation => GENERATION_CRITICAL_PERCENT,
            Phase::Search => SEARCH_CRITICAL_PERCENT,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Generation => "generation",
            Phase::Search => "search",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemoryClass {
    Normal,
    Warning,
    Critical,
}

/// Classify a reading. Thresholds are inclusive.
#[must_use]
pub fn classify(resident_mb: f64, ceiling_mb: u64, phase: Phase) -> MemoryClass {
    // Compare `resident * 100` against `ceiling * percent` so exact percentages
    // land on the threshold instead of a float rounding error away from it.
    let scaled = resident_mb * 100.0;
    let at = |percent: u32| scaled >= (ceiling_mb as f64) * f64::from(percent);

    if at(phase.critical_percent()) {
        MemoryClass::Critical
    } else if at(MEMORY_WARNING_PERCENT) {
        MemoryClass::Warning
    } else {
        MemoryClass::Normal
    }
}

/// One reading, classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    /// `None` when the sampler could not measure.
    pub resident_mb: Option<f64>,
    pub ceiling_mb: u64,
    pub phase: Phase,
    pub class: MemoryClass,
}

impl MemorySample {
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.class == MemoryClass::Critical
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.class == MemoryClass::Warning
    }
}

/// Validated memory ceiling in MB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemoryCeiling(u64);

impl MemoryCeiling {
    /// Rejects ceilings below 500 MB.
    pub fn new(mb: u64) -> Result<Self, RecoveryError> {
        if mb < MIN_MEMORY_CEILING_MB {
            return Err(RecoveryError::MemoryCeiling(mb));
        }
        Ok(Self(mb))
    }

    /// Default for a machine with `system_total_mb` of memory:
    /// half of it, at least 1000 MB, at most 16000 MB.
    #[must_use]
    pub fn for_system_total(system_total_mb: Option<u64>) -> Self {
        match system_total_mb {
            Some(total) => Self(
                (total / 2)
                    .max(DEFAULT_MEMORY_CEILING_MB)
                    .min(MAX_DEFAULT_MEMORY_CEILING_MB),
            ),
            None => Self(DEFAULT_MEMORY_CEILING_MB),
        }
    }

    /// [`for_system_total`](Self::for_system_total) using this machine's memory.
    #[must_use]
    pub fn detect() -> Self {
        Self::for_system_total(procfs::system_total_mb())
    }

    #[must_use]
    pub const fn mb(self) -> u64 {
        self.0
    }
}

impl Default for MemoryCeiling {
    fn default() -> Self {
        Self(DEFAULT_MEMORY_CEILING_MB)
    }
}

impl fmt::Display for MemoryCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MB", self.0)
    }
}

/// Samples memory and classifies it against a ceiling.
#[derive(Debug, Clone)]
pub struct MemoryGovernor<S = ProcSampler> {
    sampler: S,
    ceiling: MemoryCeiling,
}

impl MemoryGovernor<ProcSampler> {
    /// Governor backed by `/proc/self/status`.
    #[must_use]
    pub fn for_process(ceiling: MemoryCeiling) -> Self {
        Self::new(ProcSampler, ceiling)
    }
}

impl<S: MemorySampler> MemoryGovernor<S> {
    #[must_use]
    pub const fn new(sampler: S, ceiling: MemoryCeiling) -> Self {
        Self { sampler, ceiling }
    }

    #[must_use]
    pub const fn ceiling(&self) -> MemoryCeiling {
        self.ceiling
    }

    /// Take one reading for `phase`.
    pub fn sample(&self, phase: Phase) -> MemorySample {
        let resident_mb = self.sampler.resident_mb();
        let class = resident_mb.map_or(MemoryClass::Normal, |mb| {
            classify(mb, self.ceiling.mb(), phase)
        });
        MemorySample {
            resident_mb,
            ceiling_mb: self.ceiling.mb(),
            phase,
            class,
        }
    }
}
