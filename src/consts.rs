//! # Constants
//!
//! Tunables for candidate generation, the search worker, memory governance and
//! the AES Crypt header reader.

// ─────────────────────────────────────────────────────────────────────────────
// Policy limits
// ─────────────────────────────────────────────────────────────────────────────

/// Largest accepted `min_length`.
pub const MIN_LENGTH_LIMIT: usize = 10;

/// Largest accepted `max_length`.
pub const MAX_LENGTH_LIMIT: usize = 12;

/// Default candidate cap for a capped [`GenerationBudget`](crate::GenerationBudget).
///
/// Set to `1_000_000`. Only an acknowledged `unlimited` policy lifts it.
pub const DEFAULT_MAX_CANDIDATES: u64 = 1_000_000;

/// Lengths up to and including this value are always fully enumerated,
/// even when the full product would exceed the budget.
pub const SHORT_LENGTH_OVERRIDE_MAX: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Generation cadence
// ─────────────────────────────────────────────────────────────────────────────

/// Progress fires roughly this many times over one generation.
pub const PROGRESS_TICKS: u128 = 100;

/// Upper bound on the progress interval, in candidates.
pub const MAX_PROGRESS_INTERVAL: u64 = 10_000;

/// Pattern labels fire once every `PATTERN_INTERVAL_FACTOR` progress ticks.
pub const PATTERN_INTERVAL_FACTOR: u64 = 10;

/// Memory is polled during generation once per this many emitted candidates.
pub const GENERATION_MEMORY_POLL_INTERVAL: u64 = 10_000;

// ─────────────────────────────────────────────────────────────────────────────
// Search cadence
// ─────────────────────────────────────────────────────────────────────────────

/// Candidates tested between pause/cancel checkpoints.
pub const SEARCH_BATCH_SIZE: usize = 100;

/// Every `SEARCH_SAMPLE_INTERVAL`-th candidate index is reported as "currently testing".
pub const SEARCH_SAMPLE_INTERVAL: usize = 10;

/// Memory is polled during search once per this many tested candidates.
pub const SEARCH_MEMORY_POLL_INTERVAL: usize = 1_000;

// ─────────────────────────────────────────────────────────────────────────────
// Memory governance
// ─────────────────────────────────────────────────────────────────────────────

/// Warning threshold, percent of the ceiling, for both phases.
pub const MEMORY_WARNING_PERCENT: u32 = 80;

/// Critical threshold while generating candidates.
pub const GENERATION_CRITICAL_PERCENT: u32 = 95;

/// Critical threshold while searching.
pub const SEARCH_CRITICAL_PERCENT: u32 = 100;

/// Smallest memory ceiling a caller may configure.
pub const MIN_MEMORY_CEILING_MB: u64 = 500;

/// Ceiling used when system memory cannot be measured.
pub const DEFAULT_MEMORY_CEILING_MB: u64 = 1_000;

/// Cap on the derived default ceiling (16 GB).
pub const MAX_DEFAULT_MEMORY_CEILING_MB: u64 = 16_000;

// ─────────────────────────────────────────────────────────────────────────────
// AES Crypt
// ─────────────────────────────────────────────────────────────────────────────

/// Newest AES Crypt file format version the reader understands.
pub const AESCRYPT_LATEST_VERSION: u8 = 3;

/// Oldest version that carries a session authenticator the password can be checked against.
pub const AESCRYPT_MIN_CHECKABLE_VERSION: u8 = 1;

/// Minimum allowed PBKDF2 iteration count in a v3 header.
pub const PBKDF2_MIN_ITER: u32 = 1;

/// Maximum allowed PBKDF2 iteration count in a v3 header.
///
/// Headers above this are rejected rather than making every attempt unreasonably slow.
pub const PBKDF2_MAX_ITER: u32 = 5_000_000;

/// Fixed ACKDF iteration count for AES Crypt v0–v2.
pub const ACKDF_ITERATIONS: u32 = 8192;
