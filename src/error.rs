//! # Error Types
//!
//! This module defines the error types used throughout the library.
//! Fallible operations return [`Result<T, RecoveryError>`](RecoveryError); policy
//! validation has its own [`PolicyError`] which converts into it.
//!
//! Running out of budget is not an error (see
//! [`GenerationOutcome`](crate::GenerationOutcome)), and neither is a memory
//! ceiling breach (see [`CancelReason`](crate::CancelReason)).

use thiserror::Error;

/// The error type for recovery operations.
#[derive(Error, Debug)]
pub enum RecoveryError {
    /// I/O error while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key derivation or authenticator setup failed.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// The AES Crypt header is missing, malformed or unusable for recovery.
    ///
    /// - Invalid magic bytes
    /// - Invalid reserved byte
    /// - Invalid KDF iteration count
    /// - Truncated session block
    #[error("Header error: {0}")]
    Header(String),

    /// AES Crypt version outside the supported range.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// The password policy was rejected before generation started.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Memory ceiling below the accepted minimum.
    #[error("Memory ceiling of {0} MB is below the {min} MB minimum", min = crate::consts::MIN_MEMORY_CEILING_MB)]
    MemoryCeiling(u64),

    /// `start` was called on a controller that already ran.
    #[error("search already started on this controller")]
    SearchAlreadyStarted,

    /// A worker thread panicked before producing a result.
    #[error("{0} worker panicked")]
    WorkerPanicked(&'static str),
}

/// Reasons a [`PolicyBuilder`](crate::PolicyBuilder) refuses to build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// `min_length` outside `1..=MIN_LENGTH_LIMIT`.
    #[error("minimum length {0} must be between 1 and {max}", max = crate::consts::MIN_LENGTH_LIMIT)]
    MinLengthOutOfRange(usize),

    /// `max_length` outside `1..=MAX_LENGTH_LIMIT`.
    #[error("maximum length {0} must be between 1 and {max}", max = crate::consts::MAX_LENGTH_LIMIT)]
    MaxLengthOutOfRange(usize),

    /// `max_length < min_length`.
    #[error("maximum length {max} is below minimum length {min}")]
    InvertedLengths { min: usize, max: usize },

    /// `unlimited` was requested without acknowledging the memory risk.
    #[error("unlimited generation requires explicit acknowledgment")]
    UnlimitedNotAcknowledged,
}
