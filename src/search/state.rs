//! src/search/state.rs
//! Shared state between a [`SearchController`](super::SearchController) and its worker

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::cancel::CancelReason;

/// Where a search stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    NotStarted,
    Searching,
    Found(String),
    NotFound,
    Cancelled(CancelReason),
}

impl SearchResult {
    /// `Found`, `NotFound` and `Cancelled` are final.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchResult::Found(_) | SearchResult::NotFound | SearchResult::Cancelled(_)
        )
    }

    /// The recovered password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        match self {
            SearchResult::Found(password) => Some(password),
            _ => None,
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchResult::NotStarted => f.write_str("not started"),
            SearchResult::Searching => f.write_str("searching"),
            SearchResult::Found(_) => f.write_str("password found"),
            SearchResult::NotFound => f.write_str("password not found"),
            SearchResult::Cancelled(reason) => write!(f, "{reason}"),
        }
    }
}

/// Mutable search state. `cursor` is the index of the next untested candidate.
#[derive(Debug)]
pub(crate) struct SearchState {
    pub(crate) cursor: usize,
    pub(crate) paused: bool,
    pub(crate) cancelled: Option<CancelReason>,
    pub(crate) result: SearchResult,
}

/// State plus the pause gate. The condvar is notified on resume, on cancel and
/// when the result becomes terminal.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<SearchState>,
    gate: Condvar,
}

impl Shared {
    pub(crate) fn starting_at(cursor: usize) -> Self {
        Self {
            state: Mutex::new(SearchState {
                cursor,
                paused: false,
                cancelled: None,
                result: SearchResult::NotStarted,
            }),
            gate: Condvar::new(),
        }
    }

    /// A panicking observer must not wedge `pause`/`cancel` for everyone else.
    pub(crate) fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn notify_all(&self) {
        self.gate.notify_all();
    }

    /// Block while paused. Returns with the lock held once resumed or cancelled.
    pub(crate) fn wait_unpaused(&self) -> MutexGuard<'_, SearchState> {
        let guard = self.lock();
        self.gate
            .wait_while(guard, |s| s.paused && s.cancelled.is_none())
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Block up to `timeout` for a terminal result.
    pub(crate) fn wait_terminal(&self, timeout: Duration) -> Option<SearchResult> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock();
        while !guard.result.is_terminal() {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return None;
            }
            guard = self
                .gate
                .wait_timeout(guard, left)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        Some(guard.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_results() {
        assert!(!SearchResult::NotStarted.is_terminal());
        assert!(!SearchResult::Searching.is_terminal());
        assert!(SearchResult::NotFound.is_terminal());
        assert!(SearchResult::Cancelled(CancelReason::Requested).is_terminal());
        assert_eq!(SearchResult::Found("cat".into()).password(), Some("cat"));
    }

    #[test]
    fn wait_terminal_times_out_while_searching() {
        let shared = Shared::starting_at(0);
        shared.lock().result = SearchResult::Searching;
        assert_eq!(shared.wait_terminal(Duration::from_millis(20)), None);
    }

    #[test]
    fn cancel_releases_pause_gate() {
        let shared = std::sync::Arc::new(Shared::starting_at(0));
        shared.lock().paused = true;

        let waiter = {
            let shared = shared.clone();
            std::thread::spawn(move || shared.wait_unpaused().cancelled)
        };
        std::thread::sleep(Duration::from_millis(20));
        shared.lock().cancelled = Some(CancelReason::Requested);
        shared.notify_all();

        assert_eq!(waiter.join().unwrap(), Some(CancelReason::Requested));
    }
}
