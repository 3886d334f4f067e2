//! Low-level crypto primitives (KDF).
//!
//! HMAC types are defined in `aliases.rs`; the KDFs are re-exported at the crate root.

pub mod kdf;
