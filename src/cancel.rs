//! Cooperative cancellation shared between a caller and a worker.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const LIVE: u8 = 0;
const BY_CALLER: u8 = 1;
const BY_MEMORY: u8 = 2;

/// Why an operation stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called by whoever drives the operation.
    Requested,
    /// The memory governor classified usage as critical.
    MemoryExhausted,
}

impl CancelReason {
    const fn code(self) -> u8 {
        match self {
            CancelReason::Requested => BY_CALLER,
            CancelReason::MemoryExhausted => BY_MEMORY,
        }
    }

    const fn from_code(code: u8) -> Option<Self> {
        match code {
            BY_CALLER => Some(CancelReason::Requested),
            BY_MEMORY => Some(CancelReason::MemoryExhausted),
            _ => None,
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CancelReason::Requested => "cancelled by request",
            CancelReason::MemoryExhausted => "cancelled: memory ceiling reached",
        })
    }
}

/// A clonable cancellation flag. The first reason recorded wins.
///
/// Checked only at the owner's checkpoints, so cancellation takes effect at the
/// next progress tick, never mid-candidate.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<AtomicU8>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel with [`CancelReason::Requested`]. Idempotent.
    pub fn cancel(&self) {
        self.cancel_for(CancelReason::Requested);
    }

    /// Cancel with an explicit reason. Returns `false` if already cancelled.
    pub fn cancel_for(&self, reason: CancelReason) -> bool {
        self.state
            .compare_exchange(LIVE, reason.code(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) != LIVE
    }

    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        CancelReason::from_code(self.state.load(Ordering::Acquire))
    }
}
