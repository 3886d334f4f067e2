// src/lib.rs

pub mod aliases;
pub mod builders;
pub mod cancel;
pub mod consts;
pub mod crypto;
pub mod document;
pub mod error;
pub mod generator;
pub mod memory;
pub mod policy;
pub mod search;
pub mod utils;

// Policy → candidates
pub use builders::policy_builder::PolicyBuilder;
pub use generator::{
    estimate_count, generate, CandidateBatch, EnumerationStrategy, GenerationBudget,
    GenerationObserver, GenerationOutcome, GenerationTask,
};
pub use policy::{CharClass, CharClasses, Charset, PasswordPolicy};

// Candidates → result
pub use document::{validate, AescryptDocument, DocumentDecryptor, Validation};
pub use search::{SearchController, SearchObserver, SearchResult};

// Shared by both phases
pub use cancel::{CancelReason, CancelToken};
pub use memory::{
    classify, MemoryCeiling, MemoryClass, MemoryGovernor, MemorySample, MemorySampler, Phase,
    ProcSampler,
};

pub use error::{PolicyError, RecoveryError};

// Low-level KDFs, for callers checking AES Crypt headers without the document type
pub use crypto::kdf::ackdf::derive_secure_ackdf_key;
pub use crypto::kdf::pbkdf2::derive_secure_pbkdf2_key;
